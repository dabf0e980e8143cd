use thiserror::Error;

/// Errors from status operations.
///
/// Classification itself never fails on document content; malformed or
/// oddly shaped values simply hash. Only storage I/O can error.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Storage operation failed.
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),
}

/// Result alias for status operations.
pub type StatusResult<T> = Result<T, StatusError>;
