use folio_types::ObjectId;

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying driver failed (disk, network, corruption).
    #[error("driver error: {0}")]
    Driver(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A required blob was not present in the store.
    #[error("blob not found: {0}")]
    BlobMissing(ObjectId),

    /// Attempted to store content under the zero sentinel id.
    #[error("cannot store a blob under the zero id")]
    ZeroBlobId,

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
