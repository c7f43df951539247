use thiserror::Error;

/// A central error enum for everything the graph manager and account service can report.
///
/// The server maps each variant onto one HTTP status; `AlreadyRequested` is not an
/// error and lives in [`crate::graph::RequestOutcome`] instead.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidOperation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GraphError {
    pub fn validation(msg: impl Into<String>) -> Self {
        GraphError::ValidationFailed(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        GraphError::NotFound(msg.into())
    }
}

/// Failures raised by a repository backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures raised while handing a photo to the blob store.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty upload")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
