/// Aggregated error type for the high-level API.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error(transparent)]
    Status(#[from] folio_status::StatusError),

    #[error(transparent)]
    History(#[from] folio_history::HistoryError),

    #[error(transparent)]
    Merge(#[from] folio_merge::MergeError),

    #[error(transparent)]
    Sync(#[from] folio_sync::SyncError),

    #[error(transparent)]
    Store(#[from] folio_store::StoreError),
}

/// Result alias for the high-level API.
pub type FolioResult<T> = Result<T, FolioError>;
