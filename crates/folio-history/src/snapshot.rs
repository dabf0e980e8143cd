use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;

use folio_hash::snapshot_id;
use folio_store::MetadataStore;
use folio_types::{Branch, ObjectId, Snapshot, SnapshotStateEntry, Stage};

use crate::branch::BranchEngine;
use crate::error::{HistoryError, HistoryResult};

/// Builds immutable snapshots and appends them to branch history.
#[derive(Clone, Debug)]
pub struct SnapshotEngine {
    meta: MetadataStore,
    branches: BranchEngine,
    author: String,
}

impl SnapshotEngine {
    pub fn new(meta: MetadataStore, branches: BranchEngine, author: impl Into<String>) -> Self {
        Self {
            meta,
            branches,
            author: author.into(),
        }
    }

    /// Resolve a snapshot by id, failing if it is absent.
    pub async fn resolve(&self, id: &ObjectId) -> HistoryResult<Snapshot> {
        self.meta
            .snapshot(id)
            .await?
            .ok_or(HistoryError::SnapshotMissing(*id))
    }

    /// The manifest of a snapshot; the zero sentinel resolves to the empty
    /// state.
    pub async fn state_of(&self, id: &ObjectId) -> HistoryResult<Vec<SnapshotStateEntry>> {
        if id.is_zero() {
            return Ok(Vec::new());
        }
        Ok(self.resolve(id).await?.state)
    }

    /// Commit the stage as a new snapshot on the current branch.
    ///
    /// Fails with [`HistoryError::NoChanges`] if the stage is empty. The new
    /// manifest is the parent's entries minus staged deletes, plus every
    /// non-delete stage entry (the stage overrides the parent on key
    /// collision). On success the stage is cleared.
    pub async fn take_snapshot(&self, name: &str) -> HistoryResult<Snapshot> {
        let stage = self.meta.stage().await?;
        if stage.is_empty() {
            return Err(HistoryError::NoChanges);
        }

        let mut branch = self.branches.current().await?;
        let parent = branch.tip().unwrap_or_else(ObjectId::zero);
        let state = apply_stage(self.state_of(&parent).await?, &stage);

        let snapshot = self.commit_to_branch(&mut branch, name, state).await?;
        self.meta.clear_stage().await?;
        Ok(snapshot)
    }

    /// Commit an explicitly computed manifest on the current branch.
    ///
    /// The commit primitive behind merges: the stage is neither consulted
    /// nor cleared.
    pub async fn commit_state(
        &self,
        name: &str,
        state: Vec<SnapshotStateEntry>,
    ) -> HistoryResult<Snapshot> {
        let mut branch = self.branches.current().await?;
        self.commit_to_branch(&mut branch, name, state).await
    }

    async fn commit_to_branch(
        &self,
        branch: &mut Branch,
        name: &str,
        mut state: Vec<SnapshotStateEntry>,
    ) -> HistoryResult<Snapshot> {
        state.sort_by(|a, b| a.key.cmp(&b.key));

        let parent = branch.tip().unwrap_or_else(ObjectId::zero);
        let blobs: Vec<ObjectId> = state.iter().map(|e| e.blob).collect();
        let id = snapshot_id(self.meta.project(), &parent, &blobs);
        let now = Utc::now();

        let snapshot = Snapshot {
            id,
            created: now,
            parent,
            author: self.author.clone(),
            name: name.to_string(),
            description: String::new(),
            state,
        };

        branch.snapshots.push(id);
        branch.modified = now;
        self.meta.write_snapshot(&snapshot).await?;
        self.meta.write_branch(branch).await?;
        info!(
            snapshot = %id.short_hex(),
            branch = %branch.name,
            entries = snapshot.state.len(),
            "committed snapshot"
        );
        Ok(snapshot)
    }
}

/// Apply the stage on top of a parent manifest.
fn apply_stage(parent: Vec<SnapshotStateEntry>, stage: &Stage) -> Vec<SnapshotStateEntry> {
    let mut state: BTreeMap<String, SnapshotStateEntry> = parent
        .into_iter()
        .map(|entry| (entry.key.clone(), entry))
        .collect();
    for entry in stage.entries() {
        if entry.is_delete() {
            state.remove(&entry.key);
        } else {
            state.insert(
                entry.key.clone(),
                SnapshotStateEntry::new(entry.key.clone(), entry.blob, entry.name.clone()),
            );
        }
    }
    state.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use folio_hash::hash_document;
    use folio_store::{KvDriver, MemoryDriver};
    use folio_types::StageEntry;

    fn engine_on(driver: Arc<dyn KvDriver>) -> SnapshotEngine {
        let meta = MetadataStore::new(driver, "proj");
        let branches = BranchEngine::new(meta.clone());
        SnapshotEngine::new(meta, branches, "tester")
    }

    fn engine() -> SnapshotEngine {
        engine_on(Arc::new(MemoryDriver::new()))
    }

    fn add_entry(key: &str, name: &str, doc: serde_json::Value) -> StageEntry {
        StageEntry::added(key, name, hash_document(&doc), doc)
    }

    async fn stage(engine: &SnapshotEngine, entries: Vec<StageEntry>) {
        let mut stage = engine.meta.stage().await.unwrap();
        for entry in entries {
            stage.insert(entry);
        }
        engine.meta.write_stage(&stage).await.unwrap();
    }

    // -----------------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn empty_stage_cannot_commit() {
        let engine = engine();
        let err = engine.take_snapshot("nothing").await.unwrap_err();
        assert!(matches!(err, HistoryError::NoChanges));
    }

    #[tokio::test]
    async fn first_commit_has_zero_parent_and_clears_stage() {
        let engine = engine();
        stage(&engine, vec![add_entry("foo", "Foo", json!({"id": "bar"}))]).await;

        let snapshot = engine.take_snapshot("Add foo").await.unwrap();
        assert!(snapshot.parent.is_zero());
        assert_eq!(snapshot.state.len(), 1);
        assert_eq!(snapshot.state[0].key, "foo");
        assert_eq!(snapshot.state[0].blob, hash_document(&json!({"id": "bar"})));
        assert!(engine.meta.stage().await.unwrap().is_empty());

        let history = engine.branches.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, snapshot.id);
    }

    #[tokio::test]
    async fn second_commit_parents_on_prior_tip() {
        let engine = engine();
        stage(&engine, vec![add_entry("a", "A", json!({"v": 1}))]).await;
        let first = engine.take_snapshot("first").await.unwrap();

        stage(&engine, vec![add_entry("b", "B", json!({"v": 2}))]).await;
        let second = engine.take_snapshot("second").await.unwrap();

        assert_eq!(second.parent, first.id);
        // Parent entries carry over.
        assert_eq!(second.state.len(), 2);
        let history = engine.branches.history().await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn staged_delete_drops_parent_entry() {
        let engine = engine();
        stage(&engine, vec![add_entry("doc", "Doc", json!({"v": 1}))]).await;
        engine.take_snapshot("add").await.unwrap();

        stage(&engine, vec![StageEntry::deleted("doc", "Doc")]).await;
        let snapshot = engine.take_snapshot("delete").await.unwrap();
        assert!(snapshot.state.is_empty());
    }

    #[tokio::test]
    async fn stage_overrides_parent_on_key_collision() {
        let engine = engine();
        stage(&engine, vec![add_entry("doc", "Doc", json!({"v": 1}))]).await;
        engine.take_snapshot("add").await.unwrap();

        let updated = json!({"v": 2});
        stage(
            &engine,
            vec![StageEntry::modified(
                "doc",
                "Doc",
                hash_document(&updated),
                updated.clone(),
            )],
        )
        .await;
        let snapshot = engine.take_snapshot("update").await.unwrap();
        assert_eq!(snapshot.state.len(), 1);
        assert_eq!(snapshot.state[0].blob, hash_document(&updated));
    }

    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn staging_order_does_not_change_snapshot_id() {
        let a = add_entry("a", "A", json!({"v": 1}));
        let b = add_entry("b", "B", json!({"v": 2}));

        let forward = engine();
        stage(&forward, vec![a.clone(), b.clone()]).await;
        let forward_snap = forward.take_snapshot("snap").await.unwrap();

        let reverse = engine();
        stage(&reverse, vec![b, a]).await;
        let reverse_snap = reverse.take_snapshot("snap").await.unwrap();

        assert_eq!(forward_snap.id, reverse_snap.id);
    }

    #[tokio::test]
    async fn state_is_sorted_by_key() {
        let engine = engine();
        stage(
            &engine,
            vec![
                add_entry("zebra", "Z", json!({"v": 1})),
                add_entry("alpha", "A", json!({"v": 2})),
            ],
        )
        .await;
        let snapshot = engine.take_snapshot("snap").await.unwrap();
        assert_eq!(snapshot.state[0].key, "alpha");
        assert_eq!(snapshot.state[1].key, "zebra");
    }

    // -----------------------------------------------------------------------
    // commit_state
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn commit_state_ignores_stage() {
        let engine = engine();
        stage(&engine, vec![add_entry("staged", "S", json!({"v": 1}))]).await;

        let entry = SnapshotStateEntry::new("merged", hash_document(&json!({"m": 1})), "M");
        let snapshot = engine.commit_state("merge", vec![entry]).await.unwrap();
        assert_eq!(snapshot.state.len(), 1);
        assert_eq!(snapshot.state[0].key, "merged");
        // Stage untouched.
        assert!(!engine.meta.stage().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_missing_snapshot_fails() {
        let engine = engine();
        let err = engine
            .resolve(&ObjectId::from_digest([7; 20]))
            .await
            .unwrap_err();
        assert!(matches!(err, HistoryError::SnapshotMissing(_)));
    }

    #[tokio::test]
    async fn state_of_zero_is_empty() {
        let engine = engine();
        assert!(engine.state_of(&ObjectId::zero()).await.unwrap().is_empty());
    }
}
