//! Store error types.

use thiserror::Error;

/// Errors that can occur during snapshot persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error reading or writing the snapshot.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot could not be serialized or parsed.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
