use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use folio_history::{BranchEngine, HistoryError};
use folio_store::{BlobStore, MetadataStore, StoreError};
use folio_types::{ObjectId, Snapshot};

use crate::error::{SyncError, SyncResult};
use crate::transport::SyncTransport;
use crate::types::{BlobUpload, PushSummary, RemoteBranch, MISSING_PAGE_SIZE, UPLOAD_BATCH_SIZE};

/// Pushes local history to the remote service, incrementally.
///
/// A multi-snapshot push is not atomic: failure partway leaves earlier
/// snapshots pushed. Because every remote write is idempotent, simply
/// pushing again finishes the job.
pub struct SyncClient {
    transport: Arc<dyn SyncTransport>,
    meta: MetadataStore,
    blobs: BlobStore,
    branches: BranchEngine,
}

impl SyncClient {
    pub fn new(
        transport: Arc<dyn SyncTransport>,
        meta: MetadataStore,
        blobs: BlobStore,
        branches: BranchEngine,
    ) -> Self {
        Self {
            transport,
            meta,
            blobs,
            branches,
        }
    }

    /// Fetch the remote record of the current branch.
    ///
    /// Reconciling it against local history (fast-forward or merge) is the
    /// caller's concern, composed from the merge engine.
    pub async fn fetch(&self) -> SyncResult<Option<RemoteBranch>> {
        let branch = self.branches.current().await?;
        self.transport
            .branch(self.meta.project(), &branch.name)
            .await
    }

    /// Push the current branch's new snapshots to the remote.
    ///
    /// Local and remote histories must agree on every shared position;
    /// any divergence fails with [`SyncError::RemoteConflict`] before
    /// anything is sent. For each snapshot past the remote tip, blobs the
    /// remote reports missing are uploaded in bounded batches, then the
    /// snapshot itself.
    pub async fn push(&self) -> SyncResult<PushSummary> {
        let local = self.branches.current().await?;
        let remote = self
            .transport
            .branch(self.meta.project(), &local.name)
            .await?;
        let remote_ids = remote.map(|r| r.snapshots).unwrap_or_default();

        for (index, (ours, theirs)) in local.snapshots.iter().zip(&remote_ids).enumerate() {
            if ours != theirs {
                return Err(SyncError::RemoteConflict {
                    branch: local.name.clone(),
                    index,
                });
            }
        }
        if remote_ids.len() >= local.snapshots.len() {
            debug!(branch = %local.name, "remote already up to date");
            return Ok(PushSummary::default());
        }

        let mut summary = PushSummary::default();
        for id in &local.snapshots[remote_ids.len()..] {
            let snapshot = self
                .meta
                .snapshot(id)
                .await?
                .ok_or(HistoryError::SnapshotMissing(*id))?;
            summary.blobs_sent += self.push_missing_blobs(&snapshot).await?;
            self.transport
                .snapshot_create(self.meta.project(), &local.name, &snapshot)
                .await?;
            summary.snapshots_sent += 1;
        }
        info!(
            branch = %local.name,
            snapshots = summary.snapshots_sent,
            blobs = summary.blobs_sent,
            "pushed branch"
        );
        Ok(summary)
    }

    /// Upload whichever of a snapshot's blobs the remote is missing.
    async fn push_missing_blobs(&self, snapshot: &Snapshot) -> SyncResult<usize> {
        let ids: Vec<ObjectId> = snapshot
            .blob_ids()
            .into_iter()
            .filter(|id| !id.is_zero())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut missing = Vec::new();
        for page in ids.chunks(MISSING_PAGE_SIZE) {
            missing.extend(
                self.transport
                    .blobs_missing(self.meta.project(), page)
                    .await?,
            );
        }
        if missing.is_empty() {
            return Ok(0);
        }

        let mut uploads = Vec::with_capacity(missing.len());
        for id in &missing {
            let bytes = self
                .blobs
                .get_canonical(id)
                .await?
                .ok_or(StoreError::BlobMissing(*id))?;
            uploads.push(BlobUpload::new(*id, &bytes));
        }

        let mut sent = 0;
        for batch in uploads.chunks(UPLOAD_BATCH_SIZE) {
            sent += self
                .transport
                .blobs_create(self.meta.project(), batch)
                .await?;
        }
        debug!(snapshot = %snapshot.id.short_hex(), blobs = sent, "uploaded missing blobs");
        Ok(sent)
    }
}

impl std::fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncClient")
            .field("project", &self.meta.project())
            .finish()
    }
}
