/// Errors from merge operations.
///
/// Merge conflicts are not errors; they are returned as data. Only
/// structural failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// The two branches share no snapshot.
    #[error("branches {trunk:?} and {other:?} share no history")]
    UnrelatedHistory { trunk: String, other: String },

    /// The other branch's tip is already part of the current history.
    #[error("branch {0:?} is already merged")]
    AlreadyMerged(String),

    /// History operation failed (missing branch/snapshot, commit failure).
    #[error(transparent)]
    History(#[from] folio_history::HistoryError),

    /// Storage operation failed.
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),
}

/// Result alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;
