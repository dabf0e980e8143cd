use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oid::ObjectId;

/// A named, append-only list of snapshot ids forming one line of history.
///
/// The list is a valid parent chain: each snapshot's `parent` is the id
/// preceding it, and the first snapshot's parent is the zero sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name (e.g. "master", "feature/auth").
    pub name: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub modified: DateTime<Utc>,
    /// Ordered snapshot ids, oldest first.
    pub snapshots: Vec<ObjectId>,
}

impl Branch {
    /// Create an empty branch.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
            snapshots: Vec::new(),
        }
    }

    /// The id of the latest snapshot, if any.
    pub fn tip(&self) -> Option<ObjectId> {
        self.snapshots.last().copied()
    }

    /// Returns `true` if `id` appears anywhere in this branch's history.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.snapshots.contains(id)
    }

    /// Number of snapshots on this branch.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns `true` if the branch has no snapshots.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Pointer to the active branch. One per local checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    /// Name of the checked-out branch.
    pub branch: String,
}

impl Head {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
        }
    }
}
