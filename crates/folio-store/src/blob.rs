use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use folio_hash::{canonical_json, hash_document};
use folio_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::paths;
use crate::traits::KvDriver;

/// Content-addressed document storage, namespaced per project.
///
/// A blob's id is the SHA-1 of its canonical serialization, so writes are
/// idempotent by construction: identical content always maps to the identical
/// path, and re-writing it is harmless. This makes blob writes safe to race
/// even though the engine takes no locks.
#[derive(Clone)]
pub struct BlobStore {
    driver: Arc<dyn KvDriver>,
    project: String,
}

impl BlobStore {
    pub fn new(driver: Arc<dyn KvDriver>, project: impl Into<String>) -> Self {
        Self {
            driver,
            project: project.into(),
        }
    }

    /// The project this store is namespaced under.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Store a document, returning its content-addressed id.
    pub async fn put(&self, document: &Value) -> StoreResult<ObjectId> {
        let id = hash_document(document);
        if id.is_zero() {
            return Err(StoreError::ZeroBlobId);
        }
        self.driver
            .set(&paths::blob(&self.project, &id), document)
            .await?;
        debug!(blob = %id.short_hex(), "stored blob");
        Ok(id)
    }

    /// Read a document by blob id. The zero sentinel always resolves to
    /// `None`.
    pub async fn get(&self, id: &ObjectId) -> StoreResult<Option<Value>> {
        if id.is_zero() {
            return Ok(None);
        }
        self.driver.get(&paths::blob(&self.project, id)).await
    }

    /// Read a document by blob id, failing if it is absent.
    pub async fn require(&self, id: &ObjectId) -> StoreResult<Value> {
        self.get(id).await?.ok_or(StoreError::BlobMissing(*id))
    }

    /// Read a blob's canonical byte form.
    ///
    /// Bytes are re-canonicalized from the decoded value rather than read
    /// raw, so they hash back to `id` no matter how the driver encodes
    /// stored values.
    pub async fn get_canonical(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.get(id).await?.map(|value| canonical_json(&value)))
    }

    /// Check whether a blob exists.
    pub async fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore")
            .field("project", &self.project)
            .finish()
    }
}
