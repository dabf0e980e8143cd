use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use folio_types::{Branch, Head, ObjectId, Snapshot, Stage};

use crate::error::{StoreError, StoreResult};
use crate::paths;
use crate::traits::KvDriver;

/// Format version written into a project's meta record.
pub const META_FORMAT_VERSION: u32 = 1;

/// A project's meta record, written on first access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub project: String,
    pub format_version: u32,
}

/// Persists head, branches, snapshots, and the stage under the fixed path
/// prefixes.
///
/// Read methods return `Ok(None)` when a record is absent; write methods
/// overwrite. Stage and branch updates are unlocked read-modify-write at the
/// engine layer, so callers serialize operations per project themselves.
#[derive(Clone)]
pub struct MetadataStore {
    driver: Arc<dyn KvDriver>,
    project: String,
}

impl MetadataStore {
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

    async fn read_as<T: DeserializeOwned>(&self, path: &str) -> StoreResult<Option<T>> {
        match self.driver.get(path).await? {
            Some(value) => {
                let decoded = serde_json::from_value(value)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    async fn write_as<T: Serialize>(&self, path: &str, record: &T) -> StoreResult<()> {
        let value =
            serde_json::to_value(record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.driver.set(path, &value).await
    }

    // -- head --------------------------------------------------------------

    /// Read the head pointer, if set.
    pub async fn head(&self) -> StoreResult<Option<Head>> {
        self.read_as(paths::HEAD).await
    }

    /// Write the head pointer.
    pub async fn set_head(&self, head: &Head) -> StoreResult<()> {
        self.write_as(paths::HEAD, head).await
    }

    // -- stage -------------------------------------------------------------

    /// Read the persisted stage; absent means empty.
    pub async fn stage(&self) -> StoreResult<Stage> {
        Ok(self.read_as(paths::STAGE).await?.unwrap_or_default())
    }

    /// Persist the stage.
    pub async fn write_stage(&self, stage: &Stage) -> StoreResult<()> {
        self.write_as(paths::STAGE, stage).await
    }

    /// Reset the stage to empty.
    pub async fn clear_stage(&self) -> StoreResult<()> {
        self.write_stage(&Stage::new()).await
    }

    // -- branches ----------------------------------------------------------

    /// Read a branch record by name.
    pub async fn branch(&self, name: &str) -> StoreResult<Option<Branch>> {
        self.read_as(&paths::branch(&self.project, name)).await
    }

    /// Write a branch record.
    pub async fn write_branch(&self, branch: &Branch) -> StoreResult<()> {
        self.write_as(&paths::branch(&self.project, &branch.name), branch)
            .await
    }

    /// Remove a branch record.
    pub async fn remove_branch(&self, name: &str) -> StoreResult<()> {
        self.driver
            .remove(&paths::branch(&self.project, name))
            .await
    }

    /// Names of all branches in the project, ascending.
    pub async fn branch_names(&self) -> StoreResult<Vec<String>> {
        let prefix = paths::branches_prefix(&self.project);
        let keys = self.driver.keys(&prefix).await?;
        Ok(keys
            .iter()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(str::to_string)
            .collect())
    }

    // -- snapshots ---------------------------------------------------------

    /// Read a snapshot by id.
    pub async fn snapshot(&self, id: &ObjectId) -> StoreResult<Option<Snapshot>> {
        self.read_as(&paths::snapshot(&self.project, id)).await
    }

    /// Write a snapshot. Snapshots are immutable; re-writing the same id is
    /// a no-op by construction.
    pub async fn write_snapshot(&self, snapshot: &Snapshot) -> StoreResult<()> {
        self.write_as(&paths::snapshot(&self.project, &snapshot.id), snapshot)
            .await
    }

    /// Check whether a snapshot exists locally.
    pub async fn has_snapshot(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.snapshot(id).await?.is_some())
    }

    // -- meta record -------------------------------------------------------

    /// Read the project's meta record.
    pub async fn meta(&self) -> StoreResult<Option<ProjectMeta>> {
        self.read_as(&paths::project_meta(&self.project)).await
    }

    /// Write the meta record if it does not exist yet.
    pub async fn ensure_meta(&self) -> StoreResult<ProjectMeta> {
        if let Some(meta) = self.meta().await? {
            return Ok(meta);
        }
        let meta = ProjectMeta {
            project: self.project.clone(),
            format_version: META_FORMAT_VERSION,
        };
        self.write_as(&paths::project_meta(&self.project), &meta)
            .await?;
        debug!(project = %self.project, "initialized project meta");
        Ok(meta)
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore")
            .field("project", &self.project)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDriver;
    use chrono::Utc;
    use folio_types::StageEntry;

    fn store() -> MetadataStore {
        MetadataStore::new(Arc::new(MemoryDriver::new()), "proj")
    }

    fn snapshot(id: u8, parent: ObjectId) -> Snapshot {
        Snapshot {
            id: ObjectId::from_digest([id; 20]),
            created: Utc::now(),
            parent,
            author: "tester".into(),
            name: format!("snap-{id}"),
            description: String::new(),
            state: vec![],
        }
    }

    #[tokio::test]
    async fn head_roundtrip() {
        let meta = store();
        assert!(meta.head().await.unwrap().is_none());
        meta.set_head(&Head::new("master")).await.unwrap();
        assert_eq!(meta.head().await.unwrap().unwrap().branch, "master");
    }

    #[tokio::test]
    async fn absent_stage_reads_empty() {
        let meta = store();
        assert!(meta.stage().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stage_survives_roundtrip() {
        let meta = store();
        let mut stage = Stage::new();
        stage.insert(StageEntry::deleted("doc", "Doc"));
        meta.write_stage(&stage).await.unwrap();
        assert_eq!(meta.stage().await.unwrap(), stage);

        meta.clear_stage().await.unwrap();
        assert!(meta.stage().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn branch_crud() {
        let meta = store();
        assert!(meta.branch("master").await.unwrap().is_none());

        let branch = Branch::new("master");
        meta.write_branch(&branch).await.unwrap();
        assert_eq!(meta.branch("master").await.unwrap().unwrap(), branch);

        meta.remove_branch("master").await.unwrap();
        assert!(meta.branch("master").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn branch_names_sorted() {
        let meta = store();
        meta.write_branch(&Branch::new("beta")).await.unwrap();
        meta.write_branch(&Branch::new("alpha")).await.unwrap();
        assert_eq!(
            meta.branch_names().await.unwrap(),
            vec!["alpha".to_string(), "beta".to_string()]
        );
    }

    #[tokio::test]
    async fn snapshot_roundtrip() {
        let meta = store();
        let snap = snapshot(1, ObjectId::zero());
        assert!(!meta.has_snapshot(&snap.id).await.unwrap());
        meta.write_snapshot(&snap).await.unwrap();
        assert_eq!(meta.snapshot(&snap.id).await.unwrap().unwrap(), snap);
        assert!(meta.has_snapshot(&snap.id).await.unwrap());
    }

    #[tokio::test]
    async fn ensure_meta_is_idempotent() {
        let meta = store();
        let first = meta.ensure_meta().await.unwrap();
        assert_eq!(first.project, "proj");
        assert_eq!(first.format_version, META_FORMAT_VERSION);
        let second = meta.ensure_meta().await.unwrap();
        assert_eq!(first, second);
    }
}
