//! Storage ports: where documents come from and where rendered output goes.
//!
//! The runner only ever talks to [`Source`] and [`Target`]; the in-memory
//! implementations back tests, the file implementations back real suites.

use crate::errors::SourceError;
use crate::resource::Resource;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Supplies raw document text by resource.
pub trait Source: Send + Sync {
    fn fetch(&self, resource: &Resource) -> Result<String, SourceError>;
}

/// Persists rendered document text by resource.
pub trait Target: Send + Sync {
    fn store(&self, resource: &Resource, content: &str) -> io::Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory source that also remembers which resources were requested.
#[derive(Debug, Default)]
pub struct MemorySource {
    documents: HashMap<Resource, String>,
    requested: Mutex<Vec<Resource>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_resource(&mut self, resource: impl Into<Resource>, content: impl Into<String>) {
        self.documents.insert(resource.into(), content.into());
    }

    pub fn with_resource(mut self, resource: impl Into<Resource>, content: impl Into<String>) -> Self {
        self.add_resource(resource, content);
        self
    }

    /// Every resource passed to [`Source::fetch`], in call order.
    pub fn requested(&self) -> Vec<Resource> {
        lock(&self.requested).clone()
    }
}

impl Source for MemorySource {
    fn fetch(&self, resource: &Resource) -> Result<String, SourceError> {
        lock(&self.requested).push(resource.clone());
        self.documents
            .get(resource)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(resource.clone()))
    }
}

/// In-memory target keeping the last content stored per resource.
#[derive(Debug, Default)]
pub struct MemoryTarget {
    written: Mutex<HashMap<Resource, String>>,
    order: Mutex<Vec<Resource>>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self, resource: &Resource) -> Option<String> {
        lock(&self.written).get(resource).cloned()
    }

    /// Resources in the order they were stored (repeats included).
    pub fn stored(&self) -> Vec<Resource> {
        lock(&self.order).clone()
    }
}

impl Target for MemoryTarget {
    fn store(&self, resource: &Resource, content: &str) -> io::Result<()> {
        lock(&self.written).insert(resource.clone(), content.to_string());
        lock(&self.order).push(resource.clone());
        Ok(())
    }
}

/// Reads documents from a directory; a resource path is relative to `root`.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, resource: &Resource) -> PathBuf {
        file_path(&self.root, resource)
    }
}

impl Source for FileSource {
    fn fetch(&self, resource: &Resource) -> Result<String, SourceError> {
        let path = self.path_for(resource);
        debug!(path = %path.display(), "reading document");
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(resource.clone()),
            _ => SourceError::Io {
                resource: resource.clone(),
                source: e,
            },
        })
    }
}

/// Writes rendered documents under a directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct FileTarget {
    root: PathBuf,
}

impl FileTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, resource: &Resource) -> PathBuf {
        file_path(&self.root, resource)
    }
}

impl Target for FileTarget {
    fn store(&self, resource: &Resource, content: &str) -> io::Result<()> {
        let path = self.path_for(resource);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), bytes = content.len(), "writing document");
        fs::write(&path, content)
    }
}

fn file_path(root: &Path, resource: &Resource) -> PathBuf {
    resource
        .segments()
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_records_requests() {
        let source = MemorySource::new().with_resource("/a.html", "<a/>");
        assert_eq!(source.fetch(&Resource::new("/a.html")).unwrap(), "<a/>");

        let err = source.fetch(&Resource::new("/missing.html")).unwrap_err();
        assert_eq!(err.to_string(), "Resource '/missing.html' not found");
        assert_eq!(
            source.requested(),
            vec![Resource::new("/a.html"), Resource::new("/missing.html")]
        );
    }

    #[test]
    fn test_memory_target_keeps_last_write() {
        let target = MemoryTarget::new();
        let resource = Resource::new("/a.html");
        target.store(&resource, "one").unwrap();
        target.store(&resource, "two").unwrap();
        assert_eq!(target.written(&resource).as_deref(), Some("two"));
        assert_eq!(target.stored().len(), 2);
        assert!(target.written(&Resource::new("/b.html")).is_none());
    }

    #[test]
    fn test_file_ports_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let target = FileTarget::new(dir.path());
        let source = FileSource::new(dir.path());
        let resource = Resource::new("/nested/spec/Doc.html");

        target.store(&resource, "<html/>").unwrap();
        assert!(dir.path().join("nested").join("spec").join("Doc.html").exists());
        assert_eq!(source.fetch(&resource).unwrap(), "<html/>");
    }

    #[test]
    fn test_file_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path());
        let err = source.fetch(&Resource::new("/does/not/exist")).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
