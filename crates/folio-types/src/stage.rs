use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::oid::ObjectId;

/// The kind of change a stage entry records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// A document with no committed counterpart.
    Added,
    /// A document whose content differs from the committed blob.
    Modified,
    /// A committed document that no longer exists.
    Deleted,
}

/// A queued, uncommitted change to one document.
///
/// `content` is present for add/modify entries and absent for deletes; a
/// delete entry carries the zero blob id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEntry {
    /// Document key.
    pub key: String,
    /// Human-readable document name.
    pub name: String,
    /// Blob id of the staged content (zero for deletes).
    pub blob: ObjectId,
    /// The staged document value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    /// What kind of change this is.
    pub kind: ChangeKind,
}

impl StageEntry {
    /// Entry recording a brand-new document.
    pub fn added(key: impl Into<String>, name: impl Into<String>, blob: ObjectId, content: Value) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            blob,
            content: Some(content),
            kind: ChangeKind::Added,
        }
    }

    /// Entry recording changed content for a committed document.
    pub fn modified(key: impl Into<String>, name: impl Into<String>, blob: ObjectId, content: Value) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            blob,
            content: Some(content),
            kind: ChangeKind::Modified,
        }
    }

    /// Entry recording the removal of a committed document.
    pub fn deleted(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            blob: ObjectId::zero(),
            content: None,
            kind: ChangeKind::Deleted,
        }
    }

    /// Returns `true` for delete entries.
    pub fn is_delete(&self) -> bool {
        self.kind == ChangeKind::Deleted
    }
}

/// The durable set of pending, uncommitted changes, keyed by document key.
///
/// Persisted so uncommitted work survives restarts. Inserting an entry for a
/// key that is already staged replaces it (last write wins).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage {
    entries: BTreeMap<String, StageEntry>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any existing entry for the same key.
    pub fn insert(&mut self, entry: StageEntry) {
        self.entries.insert(entry.key.clone(), entry);
    }

    /// Remove the entry for `key`, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<StageEntry> {
        self.entries.remove(key)
    }

    /// Look up the entry for `key`.
    pub fn get(&self, key: &str) -> Option<&StageEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is staged.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in key order.
    pub fn entries(&self) -> impl Iterator<Item = &StageEntry> {
        self.entries.values()
    }

    /// Staged document keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of staged entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_is_last_write_wins() {
        let mut stage = Stage::new();
        stage.insert(StageEntry::added(
            "doc",
            "Doc",
            ObjectId::from_digest([1; 20]),
            json!({"v": 1}),
        ));
        stage.insert(StageEntry::modified(
            "doc",
            "Doc",
            ObjectId::from_digest([2; 20]),
            json!({"v": 2}),
        ));
        assert_eq!(stage.len(), 1);
        assert_eq!(stage.get("doc").unwrap().blob, ObjectId::from_digest([2; 20]));
        assert_eq!(stage.get("doc").unwrap().kind, ChangeKind::Modified);
    }

    #[test]
    fn delete_entries_have_zero_blob_and_no_content() {
        let entry = StageEntry::deleted("doc", "Doc");
        assert!(entry.is_delete());
        assert!(entry.blob.is_zero());
        assert!(entry.content.is_none());
    }

    #[test]
    fn remove_returns_entry() {
        let mut stage = Stage::new();
        stage.insert(StageEntry::deleted("doc", "Doc"));
        let removed = stage.remove("doc").unwrap();
        assert_eq!(removed.key, "doc");
        assert!(stage.is_empty());
        assert!(stage.remove("doc").is_none());
    }

    #[test]
    fn entries_iterate_in_key_order() {
        let mut stage = Stage::new();
        stage.insert(StageEntry::deleted("b", "B"));
        stage.insert(StageEntry::deleted("a", "A"));
        let keys: Vec<&str> = stage.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn serde_roundtrip_preserves_entries() {
        let mut stage = Stage::new();
        stage.insert(StageEntry::added(
            "doc",
            "Doc",
            ObjectId::from_digest([7; 20]),
            json!({"id": "bar"}),
        ));
        stage.insert(StageEntry::deleted("gone", "Gone"));
        let json = serde_json::to_string(&stage).unwrap();
        let parsed: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(stage, parsed);
    }

    #[test]
    fn delete_serializes_without_content_field() {
        let entry = StageEntry::deleted("doc", "Doc");
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("content").is_none());
    }
}
