//! Error types for running specifications.
//!
//! [`SpecError`] covers the failures that stop a run before it produces a
//! summary. Failed assertions and fixture errors are not errors at this
//! level: they become outcomes and show up in the summary.

use specdoc::{DocumentError, Resource};
use thiserror::Error;

/// Errors that abort processing a document.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The runner was invoked without what it needs (e.g. no fixture).
    #[error("{0}")]
    Configuration(String),

    /// The source has no document for the resource.
    #[error("Resource '{0}' not found")]
    ResourceNotFound(Resource),

    /// The source failed for another reason.
    #[error("failed to read resource '{resource}': {source}")]
    Source {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },

    /// The document text is not well-formed.
    #[error("malformed document '{resource}': {source}")]
    Malformed {
        resource: Resource,
        #[source]
        source: DocumentError,
    },

    /// The target could not persist the rendered output.
    #[error("failed to write resource '{resource}': {source}")]
    Target {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be read or parsed.
    #[error("failed to load config {path}: {message}")]
    Config { path: String, message: String },
}

/// Result type for runner operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// A completed run that recorded failures or exceptions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "Specification '{resource}' has {failures} failure(s) and {exceptions} exception(s). See the rendered output for details."
)]
pub struct Unsatisfied {
    pub resource: Resource,
    pub failures: usize,
    pub exceptions: usize,
}
