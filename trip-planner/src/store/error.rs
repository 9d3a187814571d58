//! Storage error types.

/// Errors that can occur when reading or writing trip documents.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Collection or document id unusable as a storage key
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// The backing store reported a failure
    #[error("backend error: {0}")]
    Backend(String),
}
