//! Foundation types for Folio.
//!
//! This crate provides the data model shared by every other Folio crate:
//! snapshots, branches, the stage, and the content-addressed identifiers
//! that tie them together.
//!
//! # Key Types
//!
//! - [`ObjectId`] — 40-hex SHA-1 identifier for blobs and snapshots
//! - [`Snapshot`] — immutable commit of the full document-state manifest
//! - [`Branch`] — named, ordered list of snapshot ids
//! - [`Head`] — pointer to the active branch
//! - [`Stage`] — durable set of pending, uncommitted changes
//! - [`StatusCandidate`] — a live document value offered for comparison

pub mod branch;
pub mod candidate;
pub mod error;
pub mod oid;
pub mod snapshot;
pub mod stage;

pub use branch::{Branch, Head};
pub use candidate::StatusCandidate;
pub use error::TypeError;
pub use oid::ObjectId;
pub use snapshot::{Snapshot, SnapshotStateEntry};
pub use stage::{ChangeKind, Stage, StageEntry};

/// Opaque string uniquely identifying a versionable document, stable across
/// edits.
pub type DocumentKey = String;

/// Alias for ids addressing blob content.
pub type BlobId = ObjectId;

/// Alias for ids addressing snapshots.
pub type SnapshotId = ObjectId;
