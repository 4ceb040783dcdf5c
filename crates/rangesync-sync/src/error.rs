//! Error types for the reconciliation engine.

use thiserror::Error;

/// Errors that can occur while serving a reconciliation request.
///
/// A classification is never an error: `Empty`, `Mismatch` and `Match`
/// are all successful answers to a well-formed request.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A required field is missing or unparseable. Raised before any
    /// storage access.
    #[error("request malformed: {0}")]
    RequestMalformed(String),

    /// The backend could not prepare or execute a required statement.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rangesync_store::StoreError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;
