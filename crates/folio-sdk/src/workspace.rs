use std::sync::Arc;

use folio_history::{BranchEngine, SnapshotEngine};
use folio_merge::{MergeEngine, MergeOutcome};
use folio_status::{Status, StatusEngine};
use folio_store::{BlobStore, KvDriver, MemoryDriver, MetadataStore};
use folio_sync::{SyncClient, SyncTransport};
use folio_types::{DocumentKey, Snapshot, Stage, StageEntry, StatusCandidate};

use crate::config::FolioConfig;
use crate::error::FolioResult;

/// One project checkout: the engine stack wired over a single driver.
///
/// Operations are unlocked read-modify-write at the storage layer; callers
/// serialize operations against a given project themselves.
pub struct Folio {
    config: FolioConfig,
    blobs: BlobStore,
    meta: MetadataStore,
    status: StatusEngine,
    branches: BranchEngine,
    snapshots: SnapshotEngine,
    merge: MergeEngine,
}

impl Folio {
    /// Open a checkout over `driver`, writing the project meta record and
    /// head lazily as needed.
    pub async fn open(driver: Arc<dyn KvDriver>, config: FolioConfig) -> FolioResult<Self> {
        let meta = MetadataStore::new(Arc::clone(&driver), config.project.clone());
        let blobs = BlobStore::new(driver, config.project.clone());
        let branches = BranchEngine::with_root(meta.clone(), config.root_branch.clone());
        let snapshots = SnapshotEngine::new(meta.clone(), branches.clone(), config.author.clone());
        let status = StatusEngine::new(meta.clone(), blobs.clone());
        let merge = MergeEngine::new(meta.clone(), branches.clone(), snapshots.clone());

        meta.ensure_meta().await?;
        Ok(Self {
            config,
            blobs,
            meta,
            status,
            branches,
            snapshots,
            merge,
        })
    }

    /// Open a checkout backed by a fresh in-memory driver.
    pub async fn in_memory(config: FolioConfig) -> FolioResult<Self> {
        Self::open(Arc::new(MemoryDriver::new()), config).await
    }

    // ---- Status & staging ----

    /// Classify live candidates against committed and staged state.
    pub async fn status(&self, candidates: &[StatusCandidate]) -> FolioResult<Status> {
        Ok(self.status.status(candidates).await?)
    }

    /// Stage the given entries, persisting add/modify content.
    pub async fn stage(&self, entries: Vec<StageEntry>) -> FolioResult<Stage> {
        Ok(self.status.stage(entries).await?)
    }

    /// Remove matching keys from the stage.
    pub async fn unstage(&self, keys: &[DocumentKey]) -> FolioResult<Stage> {
        Ok(self.status.unstage(keys).await?)
    }

    // ---- History ----

    /// Commit the stage as a new snapshot on the current branch.
    pub async fn commit(&self, name: &str) -> FolioResult<Snapshot> {
        Ok(self.snapshots.take_snapshot(name).await?)
    }

    /// The current branch's snapshot chain, oldest first.
    pub async fn history(&self) -> FolioResult<Vec<Snapshot>> {
        Ok(self.branches.history().await?)
    }

    /// Name of the currently checked-out branch.
    pub async fn current_branch(&self) -> FolioResult<String> {
        Ok(self.branches.head().await?.branch)
    }

    /// Create a branch sharing the current tip.
    pub async fn fork(&self, name: &str) -> FolioResult<()> {
        self.branches.fork(name).await?;
        Ok(())
    }

    /// Switch to a branch, creating it if absent.
    pub async fn checkout(&self, name: &str) -> FolioResult<()> {
        self.branches.checkout(name).await?;
        Ok(())
    }

    /// Remove a branch (not the checked-out one).
    pub async fn remove_branch(&self, name: &str) -> FolioResult<()> {
        Ok(self.branches.remove(name).await?)
    }

    /// Names of all branches in the project.
    pub async fn branches(&self) -> FolioResult<Vec<String>> {
        Ok(self.branches.branches().await?)
    }

    // ---- Merge ----

    /// Merge another branch into the current one.
    pub async fn merge(
        &self,
        candidates: &[StatusCandidate],
        other: &str,
    ) -> FolioResult<MergeOutcome> {
        Ok(self.merge.merge(candidates, other).await?)
    }

    // ---- Sync ----

    /// Build a sync client for this checkout over `transport`.
    pub fn sync_client(&self, transport: Arc<dyn SyncTransport>) -> SyncClient {
        SyncClient::new(
            transport,
            self.meta.clone(),
            self.blobs.clone(),
            self.branches.clone(),
        )
    }

    // ---- Accessors ----

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn blob_store(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn metadata_store(&self) -> &MetadataStore {
        &self.meta
    }
}

impl std::fmt::Debug for Folio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Folio")
            .field("project", &self.config.project)
            .finish()
    }
}
