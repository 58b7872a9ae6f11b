//! Error types for the template core

use std::path::PathBuf;

use thiserror::Error;

/// Errors from template, codec and file operations
#[derive(Debug, Error)]
pub enum PromptError {
    /// Exchange document or persisted field blob is malformed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Fields or exchange document could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// Requested template or record does not exist (or none was selected)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Filesystem read or write failed
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Editor precondition violated (empty name, radio without options, ...)
    #[error("Invalid: {0}")]
    Invalid(String),
}

impl PromptError {
    /// Wrap an I/O failure together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for malformed input, as opposed to I/O or lookup failures
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Result alias used across the crate
pub type PromptResult<T> = Result<T, PromptError>;
