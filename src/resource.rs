//! Logical resource identifiers for specification documents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized, slash-separated logical path naming a document.
///
/// Resources are independent of physical storage: a [`Source`](crate::Source)
/// or [`Target`](crate::Target) decides what a path means. Two resources are
/// equal when their normalized paths are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Resource {
    path: String,
}

impl Resource {
    /// Create a resource from any path, normalizing it.
    ///
    /// ```
    /// use specdoc::Resource;
    ///
    /// let resource = Resource::new("spec//greeting/./../Hello.html");
    /// assert_eq!(resource.path(), "/spec/Hello.html");
    /// ```
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            path: normalize(path.as_ref()),
        }
    }

    /// Derive the resource for a fixture type name.
    ///
    /// Both `.` and `::` separate path segments, so `example.Fixture` and
    /// `example::Fixture` map to `/example/Fixture.<extension>`.
    pub fn from_type_name(type_name: &str, extension: &str) -> Self {
        let path = type_name.replace("::", "/").replace('.', "/");
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            Self::new(path)
        } else {
            Self::new(format!("{}.{}", path, extension))
        }
    }

    /// The normalized path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The last path segment, or an empty string for the root.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or("")
    }

    /// The enclosing directory, or `None` for the root.
    pub fn parent(&self) -> Option<Resource> {
        if self.path == "/" {
            return None;
        }
        let cut = self.path.rfind('/').unwrap_or(0);
        Some(Resource::new(&self.path[..cut]))
    }

    /// Resolve a reference relative to this resource's directory.
    ///
    /// References starting with `/` are absolute. Fragments and query strings
    /// are stripped; a reference that is only a fragment names this resource.
    pub fn resolve(&self, reference: &str) -> Resource {
        let reference = reference
            .split(|c| c == '#' || c == '?')
            .next()
            .unwrap_or("")
            .trim();
        if reference.is_empty() {
            return self.clone();
        }
        if reference.starts_with('/') {
            return Resource::new(reference);
        }
        let base = self.parent().map(|p| p.path).unwrap_or_default();
        Resource::new(format!("{}/{}", base, reference))
    }

    /// Path segments without the leading root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for Resource {
    fn from(path: &str) -> Self {
        Resource::new(path)
    }
}

impl From<String> for Resource {
    fn from(path: String) -> Self {
        Resource::new(path)
    }
}

impl From<Resource> for String {
    fn from(resource: Resource) -> Self {
        resource.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_paths() {
        assert_eq!(Resource::new("mytest").path(), "/mytest");
        assert_eq!(Resource::new("/a//b/./c").path(), "/a/b/c");
        assert_eq!(Resource::new("/a/b/../c").path(), "/a/c");
        assert_eq!(Resource::new("../../x").path(), "/x");
        assert_eq!(Resource::new("a\\b.html").path(), "/a/b.html");
        assert_eq!(Resource::new("").path(), "/");
    }

    #[test]
    fn test_equality_uses_normalized_value() {
        assert_eq!(Resource::new("/a/b.html"), Resource::new("a//b.html"));
        assert_ne!(Resource::new("/a/b.html"), Resource::new("/a/B.html"));
    }

    #[test]
    fn test_from_type_name() {
        let resource = Resource::from_type_name(
            "test.concordance.internal.SpecTest$EmptyFixture",
            "html",
        );
        assert_eq!(
            resource.path(),
            "/test/concordance/internal/SpecTest$EmptyFixture.html"
        );

        let rust_path = Resource::from_type_name("my_crate::specs::Greeting", ".html");
        assert_eq!(rust_path.path(), "/my_crate/specs/Greeting.html");
    }

    #[test]
    fn test_distinct_types_derive_distinct_resources() {
        let a = Resource::from_type_name("example.Fixture", "html");
        let b = Resource::from_type_name("example.OtherFixture", "html");
        assert_ne!(a, b);
    }

    #[test]
    fn test_name_and_parent() {
        let resource = Resource::new("/spec/greeting/Hello.html");
        assert_eq!(resource.name(), "Hello.html");
        assert_eq!(resource.parent(), Some(Resource::new("/spec/greeting")));
        assert_eq!(Resource::new("/top.html").parent(), Some(Resource::new("/")));
        assert_eq!(Resource::new("/").parent(), None);
    }

    #[test]
    fn test_resolve_relative_references() {
        let resource = Resource::new("/spec/greeting/Hello.html");
        assert_eq!(resource.resolve("Other.html").path(), "/spec/greeting/Other.html");
        assert_eq!(resource.resolve("../Index.html").path(), "/spec/Index.html");
        assert_eq!(resource.resolve("/abs/Doc.html").path(), "/abs/Doc.html");
        assert_eq!(
            resource.resolve("sub/Deep.html#section").path(),
            "/spec/greeting/sub/Deep.html"
        );
        assert_eq!(resource.resolve("#details"), resource);
        assert_eq!(resource.resolve("?page=2"), resource);
    }
}
