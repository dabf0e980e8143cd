use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::oid::ObjectId;

/// One row of a snapshot's manifest: a document key bound to the blob
/// holding its content at commit time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStateEntry {
    /// Document key, stable across edits.
    pub key: String,
    /// Content-addressed id of the document's blob.
    pub blob: ObjectId,
    /// Human-readable document name at commit time.
    pub name: String,
}

impl SnapshotStateEntry {
    pub fn new(key: impl Into<String>, blob: ObjectId, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            blob,
            name: name.into(),
        }
    }
}

/// An immutable commit of the full document-state manifest.
///
/// A snapshot never mutates after creation. Its `id` is derived from the
/// project, the parent id, and the sorted set of manifest blob ids, so
/// logically identical histories built by independent clients converge to
/// identical ids regardless of staging order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Deterministic content-derived id.
    pub id: ObjectId,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Parent snapshot id; the zero sentinel for a history's first snapshot.
    pub parent: ObjectId,
    /// Author recorded at commit time.
    pub author: String,
    /// Commit message / snapshot name.
    pub name: String,
    /// Optional longer description.
    pub description: String,
    /// Full manifest of documents at this point in history.
    pub state: Vec<SnapshotStateEntry>,
}

impl Snapshot {
    /// The manifest keyed by document key.
    pub fn state_map(&self) -> BTreeMap<&str, &SnapshotStateEntry> {
        self.state
            .iter()
            .map(|entry| (entry.key.as_str(), entry))
            .collect()
    }

    /// Look up a manifest entry by document key.
    pub fn entry(&self, key: &str) -> Option<&SnapshotStateEntry> {
        self.state.iter().find(|e| e.key == key)
    }

    /// All blob ids referenced by the manifest.
    pub fn blob_ids(&self) -> Vec<ObjectId> {
        self.state.iter().map(|e| e.blob).collect()
    }

    /// Returns `true` if this is a history's first snapshot.
    pub fn is_root(&self) -> bool {
        self.parent.is_zero()
    }
}
