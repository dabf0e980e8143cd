use tracing::{debug, info};

use folio_store::MetadataStore;
use folio_types::{Branch, Head, Snapshot};

use crate::error::{HistoryError, HistoryResult};
use crate::names::validate_branch_name;

/// Name of the branch created on first access.
pub const ROOT_BRANCH: &str = "master";

/// Manages named pointers into snapshot history.
///
/// Head and the root branch are created lazily the first time anything asks
/// for them; nothing is written until then. Branch records are mutated via
/// unlocked read-modify-write, so callers must serialize operations against
/// a given project themselves.
#[derive(Clone, Debug)]
pub struct BranchEngine {
    meta: MetadataStore,
    root: String,
}

impl BranchEngine {
    pub fn new(meta: MetadataStore) -> Self {
        Self::with_root(meta, ROOT_BRANCH)
    }

    /// Use a root branch name other than [`ROOT_BRANCH`].
    pub fn with_root(meta: MetadataStore, root: impl Into<String>) -> Self {
        Self {
            meta,
            root: root.into(),
        }
    }

    /// The head pointer, created lazily on first access.
    pub async fn head(&self) -> HistoryResult<Head> {
        if let Some(head) = self.meta.head().await? {
            return Ok(head);
        }
        let head = Head::new(self.root.clone());
        self.meta.set_head(&head).await?;
        debug!(branch = %head.branch, "initialized head");
        Ok(head)
    }

    /// The currently checked-out branch, created lazily if absent.
    pub async fn current(&self) -> HistoryResult<Branch> {
        let head = self.head().await?;
        self.open(&head.branch).await
    }

    /// Resolve a branch by name, creating an empty record if absent.
    async fn open(&self, name: &str) -> HistoryResult<Branch> {
        validate_branch_name(name)?;
        if let Some(branch) = self.meta.branch(name).await? {
            return Ok(branch);
        }
        let branch = Branch::new(name);
        self.meta.write_branch(&branch).await?;
        debug!(branch = name, "created branch");
        Ok(branch)
    }

    /// Resolve a branch by name, failing if it does not exist.
    pub async fn branch_required(&self, name: &str) -> HistoryResult<Branch> {
        self.meta
            .branch(name)
            .await?
            .ok_or_else(|| HistoryError::BranchMissing(name.to_string()))
    }

    /// Switch head to `name`, lazily creating the branch if absent.
    pub async fn checkout(&self, name: &str) -> HistoryResult<Branch> {
        let branch = self.open(name).await?;
        self.meta.set_head(&Head::new(name)).await?;
        info!(branch = name, "checked out branch");
        Ok(branch)
    }

    /// Create `new_name` sharing the current branch's tip.
    ///
    /// The snapshot list is copied wholesale: the new branch starts at the
    /// same tip without re-walking history, and the two records share no
    /// mutable state.
    pub async fn fork(&self, new_name: &str) -> HistoryResult<Branch> {
        validate_branch_name(new_name)?;
        if self.meta.branch(new_name).await?.is_some() {
            return Err(HistoryError::BranchExists(new_name.to_string()));
        }
        let current = self.current().await?;
        let mut branch = Branch::new(new_name);
        branch.snapshots = current.snapshots.clone();
        self.meta.write_branch(&branch).await?;
        info!(from = %current.name, to = new_name, "forked branch");
        Ok(branch)
    }

    /// Remove a branch record.
    ///
    /// Fails if `name` is empty or is the currently checked-out branch;
    /// removing a branch that does not exist is a no-op.
    pub async fn remove(&self, name: &str) -> HistoryResult<()> {
        if name.is_empty() {
            return Err(HistoryError::InvalidName {
                name: name.to_string(),
                reason: "branch name must not be empty".into(),
            });
        }
        let head = self.head().await?;
        if head.branch == name {
            return Err(HistoryError::RemoveCurrent(name.to_string()));
        }
        self.meta.remove_branch(name).await?;
        info!(branch = name, "removed branch");
        Ok(())
    }

    /// Names of all branches in the project.
    pub async fn branches(&self) -> HistoryResult<Vec<String>> {
        Ok(self.meta.branch_names().await?)
    }

    /// Resolve the current branch's full snapshot chain, oldest first.
    ///
    /// Fails with [`HistoryError::SnapshotMissing`] if any id in the chain
    /// cannot be resolved, which signals a corrupted or partially synced
    /// store.
    pub async fn history(&self) -> HistoryResult<Vec<Snapshot>> {
        let branch = self.current().await?;
        let mut snapshots = Vec::with_capacity(branch.snapshots.len());
        for id in &branch.snapshots {
            let snapshot = self
                .meta
                .snapshot(id)
                .await?
                .ok_or(HistoryError::SnapshotMissing(*id))?;
            snapshots.push(snapshot);
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use folio_store::{KvDriver, MemoryDriver};
    use folio_types::ObjectId;

    fn engine() -> BranchEngine {
        let driver: Arc<dyn KvDriver> = Arc::new(MemoryDriver::new());
        BranchEngine::new(MetadataStore::new(driver, "proj"))
    }

    #[tokio::test]
    async fn head_and_root_branch_created_lazily() {
        let engine = engine();
        let head = engine.head().await.unwrap();
        assert_eq!(head.branch, ROOT_BRANCH);

        let branch = engine.current().await.unwrap();
        assert_eq!(branch.name, ROOT_BRANCH);
        assert!(branch.is_empty());
    }

    #[tokio::test]
    async fn checkout_creates_and_switches() {
        let engine = engine();
        engine.checkout("feature").await.unwrap();
        assert_eq!(engine.head().await.unwrap().branch, "feature");
        assert_eq!(engine.current().await.unwrap().name, "feature");
    }

    #[tokio::test]
    async fn checkout_rejects_invalid_names() {
        let engine = engine();
        let err = engine.checkout("bad name").await.unwrap_err();
        assert!(matches!(err, HistoryError::InvalidName { .. }));
    }

    #[tokio::test]
    async fn fork_copies_snapshot_list() {
        let engine = engine();
        let mut master = engine.current().await.unwrap();
        master.snapshots.push(ObjectId::from_digest([1; 20]));
        engine.meta.write_branch(&master).await.unwrap();

        let forked = engine.fork("feature").await.unwrap();
        assert_eq!(forked.snapshots, master.snapshots);
    }

    #[tokio::test]
    async fn fork_existing_name_fails() {
        let engine = engine();
        engine.fork("feature").await.unwrap();
        let err = engine.fork("feature").await.unwrap_err();
        assert!(matches!(err, HistoryError::BranchExists(_)));
    }

    #[tokio::test]
    async fn fork_does_not_share_mutable_state() {
        let engine = engine();
        engine.current().await.unwrap();
        let mut forked = engine.fork("feature").await.unwrap();
        forked.snapshots.push(ObjectId::from_digest([2; 20]));
        engine.meta.write_branch(&forked).await.unwrap();

        let master = engine.current().await.unwrap();
        assert!(master.is_empty());
    }

    #[tokio::test]
    async fn remove_current_branch_fails() {
        let engine = engine();
        engine.current().await.unwrap();
        let err = engine.remove(ROOT_BRANCH).await.unwrap_err();
        assert!(matches!(err, HistoryError::RemoveCurrent(_)));
    }

    #[tokio::test]
    async fn remove_empty_name_fails() {
        let engine = engine();
        let err = engine.remove("").await.unwrap_err();
        assert!(matches!(err, HistoryError::InvalidName { .. }));
    }

    #[tokio::test]
    async fn remove_other_branch_succeeds() {
        let engine = engine();
        engine.fork("feature").await.unwrap();
        engine.remove("feature").await.unwrap();
        assert_eq!(engine.branches().await.unwrap(), vec![ROOT_BRANCH.to_string()]);
    }

    #[tokio::test]
    async fn branch_required_missing_fails() {
        let engine = engine();
        let err = engine.branch_required("ghost").await.unwrap_err();
        assert!(matches!(err, HistoryError::BranchMissing(_)));
    }

    #[tokio::test]
    async fn history_with_unresolvable_id_fails() {
        let engine = engine();
        let mut master = engine.current().await.unwrap();
        master.snapshots.push(ObjectId::from_digest([9; 20]));
        engine.meta.write_branch(&master).await.unwrap();

        let err = engine.history().await.unwrap_err();
        assert!(matches!(err, HistoryError::SnapshotMissing(_)));
    }

    #[tokio::test]
    async fn custom_root_branch() {
        let driver: Arc<dyn KvDriver> = Arc::new(MemoryDriver::new());
        let engine = BranchEngine::with_root(MetadataStore::new(driver, "proj"), "trunk");
        assert_eq!(engine.head().await.unwrap().branch, "trunk");
    }
}
