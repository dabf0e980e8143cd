use serde_json::Value;

/// Errors from sync operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Local and remote history disagree on a shared position.
    #[error("remote branch {branch:?} diverged at position {index}")]
    RemoteConflict { branch: String, index: usize },

    /// Network or API failure, carrying the server's error payload when one
    /// was returned.
    #[error("remote transport error: {message}")]
    Transport {
        message: String,
        payload: Option<Value>,
    },

    /// History operation failed (missing snapshot, unresolved branch).
    #[error(transparent)]
    History(#[from] folio_history::HistoryError),

    /// Storage operation failed.
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),
}

impl SyncError {
    /// Transport failure without a server payload.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            payload: None,
        }
    }

    /// Transport failure carrying the server's error payload.
    pub fn transport_with_payload(message: impl Into<String>, payload: Value) -> Self {
        Self::Transport {
            message: message.into(),
            payload: Some(payload),
        }
    }
}

/// Result alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
