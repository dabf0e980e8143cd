//! Synchronization client for Folio.
//!
//! Exchanges snapshots and blobs with a remote service through the
//! [`SyncTransport`] seam. Push is incremental: only snapshots past the
//! remote tip travel, and only blobs the remote reports missing are
//! uploaded, in bounded batches. A multi-snapshot push is not atomic
//! (partial failure leaves some snapshots pushed), but every remote write is
//! idempotent, so retrying is always safe.
//!
//! Pull reconciliation is a caller concern: [`SyncClient::fetch`] surfaces
//! the remote branch record, and callers compose it with the merge engine.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::SyncClient;
pub use error::{SyncError, SyncResult};
pub use transport::SyncTransport;
pub use types::{BlobUpload, PushSummary, RemoteBranch, MISSING_PAGE_SIZE, UPLOAD_BATCH_SIZE};
