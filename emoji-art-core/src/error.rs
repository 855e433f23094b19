//! Error types for document operations.

use thiserror::Error;

/// Result type for document operations.
pub type ArtResult<T> = Result<T, ArtError>;

/// Errors that can occur while editing a document.
///
/// Operations on an emoji id that is not in the document are not errors: a
/// gesture ending after the emoji was deleted is expected, so those calls are
/// silent no-ops.
#[derive(Debug, Error)]
pub enum ArtError {
    /// An argument was outside its valid range (e.g. a non-positive scale).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing a document file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArtError {
    /// Build an [`ArtError::InvalidArgument`] for a scale factor.
    pub(crate) fn invalid_factor(factor: f64) -> Self {
        Self::InvalidArgument(format!("scale factor must be positive, got {factor}"))
    }
}
