use async_trait::async_trait;

use folio_types::{ObjectId, Snapshot};

use crate::error::SyncResult;
use crate::types::{BlobUpload, RemoteBranch};

/// Transport seam to the remote sync service.
///
/// Implementations speak the actual wire protocol (HTTPS, session-scoped by
/// a session header) outside this crate. All remote writes are idempotent:
/// re-creating an already-present blob or snapshot is a no-op, which is what
/// makes retrying a partially failed push safe.
#[async_trait]
pub trait SyncTransport: Send + Sync {
    /// Fetch a branch record. Returns `Ok(None)` if the remote has no such
    /// branch yet.
    async fn branch(&self, project: &str, name: &str) -> SyncResult<Option<RemoteBranch>>;

    /// Of `ids`, the ones the remote does not hold. Callers page requests to
    /// at most [`MISSING_PAGE_SIZE`] ids.
    ///
    /// [`MISSING_PAGE_SIZE`]: crate::types::MISSING_PAGE_SIZE
    async fn blobs_missing(&self, project: &str, ids: &[ObjectId]) -> SyncResult<Vec<ObjectId>>;

    /// Upload a batch of blobs, returning how many the remote accepted.
    /// Callers batch to at most [`UPLOAD_BATCH_SIZE`] blobs.
    ///
    /// [`UPLOAD_BATCH_SIZE`]: crate::types::UPLOAD_BATCH_SIZE
    async fn blobs_create(&self, project: &str, blobs: &[BlobUpload]) -> SyncResult<usize>;

    /// Upload a snapshot onto the named remote branch, returning its id.
    async fn snapshot_create(
        &self,
        project: &str,
        branch: &str,
        snapshot: &Snapshot,
    ) -> SyncResult<ObjectId>;
}
