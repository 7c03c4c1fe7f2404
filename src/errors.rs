//! Error types for parsing documents and reading them from a source.

use crate::resource::Resource;
use thiserror::Error;

/// Errors produced while turning markup text into a [`Document`](crate::Document).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    /// The text is not well-formed markup.
    #[error("malformed document at {line}:{column}: {message}")]
    Malformed {
        message: String,
        line: u32,
        column: u32,
    },
}

/// Errors produced by a [`Source`](crate::Source).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Resource '{0}' not found")]
    NotFound(Resource),

    #[error("failed to read resource '{resource}': {source}")]
    Io {
        resource: Resource,
        #[source]
        source: std::io::Error,
    },
}

pub type DocumentResult<T> = Result<T, DocumentError>;
