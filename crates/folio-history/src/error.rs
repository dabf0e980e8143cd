use folio_types::ObjectId;

/// Errors from snapshot and branch operations.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// Commit was requested with an empty stage.
    #[error("no staged changes to commit")]
    NoChanges,

    /// Fork target name is already taken.
    #[error("branch already exists: {0:?}")]
    BranchExists(String),

    /// A named branch could not be resolved.
    #[error("branch not found: {0:?}")]
    BranchMissing(String),

    /// A snapshot id in a branch chain could not be resolved. Signals a
    /// corrupted or partially synced store.
    #[error("snapshot not found: {0}")]
    SnapshotMissing(ObjectId),

    /// The branch name is not usable.
    #[error("invalid branch name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Attempted to remove the branch head points at.
    #[error("cannot remove the checked-out branch {0:?}")]
    RemoveCurrent(String),

    /// Storage operation failed.
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),
}

/// Result alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
