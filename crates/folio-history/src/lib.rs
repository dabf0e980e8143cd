//! History engines for Folio.
//!
//! [`SnapshotEngine`] turns the stage into immutable snapshots with
//! deterministic ids; [`BranchEngine`] manages the named pointers into that
//! history: forking, checkout, removal, and chain resolution. Head and the
//! root branch are created lazily on first access.

pub mod branch;
pub mod error;
pub mod names;
pub mod snapshot;

pub use branch::{BranchEngine, ROOT_BRANCH};
pub use error::{HistoryError, HistoryResult};
pub use names::validate_branch_name;
pub use snapshot::SnapshotEngine;
