//! Canonical serialization and content hashing for Folio.
//!
//! Blob and snapshot identities both reduce to SHA-1 over deterministic
//! byte strings: a document hashes to the digest of its canonical (key-sorted)
//! JSON serialization, and a snapshot id is derived from the project, the
//! parent id, and the sorted set of manifest blob ids.

pub mod canonical;
pub mod hasher;

pub use canonical::canonical_json;
pub use hasher::{hash_bytes, hash_document, snapshot_id};
