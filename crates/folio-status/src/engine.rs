use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use folio_hash::hash_document;
use folio_store::{BlobStore, MetadataStore};
use folio_types::{DocumentKey, SnapshotStateEntry, Stage, StageEntry, StatusCandidate};

use crate::error::StatusResult;
use crate::report::Status;

/// Classifies live candidates against committed and staged state, and
/// persists the caller's staging selections.
///
/// Stage updates are unlocked read-modify-write; callers serialize
/// operations against a given project themselves.
#[derive(Clone, Debug)]
pub struct StatusEngine {
    meta: MetadataStore,
    blobs: BlobStore,
}

impl StatusEngine {
    pub fn new(meta: MetadataStore, blobs: BlobStore) -> Self {
        Self { meta, blobs }
    }

    /// The committed manifest at the current branch tip.
    ///
    /// A missing head, branch, tip, or snapshot all read as the empty state:
    /// head and the root branch are created lazily elsewhere, and status
    /// itself never writes.
    async fn committed_state(&self) -> StatusResult<BTreeMap<DocumentKey, SnapshotStateEntry>> {
        let Some(head) = self.meta.head().await? else {
            return Ok(BTreeMap::new());
        };
        let Some(branch) = self.meta.branch(&head.branch).await? else {
            return Ok(BTreeMap::new());
        };
        let Some(tip) = branch.tip() else {
            return Ok(BTreeMap::new());
        };
        let Some(snapshot) = self.meta.snapshot(&tip).await? else {
            return Ok(BTreeMap::new());
        };
        Ok(snapshot
            .state
            .into_iter()
            .map(|entry| (entry.key.clone(), entry))
            .collect())
    }

    /// Compute per-document add/modify/delete classification.
    ///
    /// Returns the persisted stage plus the computed `unstaged` map. A key
    /// may appear in both when its staged value differs from the current
    /// live value. Malformed content is not an error; it hashes like
    /// anything else and classifies as an add or modify.
    pub async fn status(&self, candidates: &[StatusCandidate]) -> StatusResult<Status> {
        let state = self.committed_state().await?;
        let stage = self.meta.stage().await?;

        let mut unstaged = BTreeMap::new();
        for candidate in candidates {
            let blob = hash_document(&candidate.document);

            // Already staged with identical content: nothing new to report.
            if stage.get(&candidate.key).is_some_and(|e| e.blob == blob) {
                continue;
            }

            match state.get(&candidate.key) {
                Some(committed) if committed.blob == blob => continue,
                Some(_) => {
                    unstaged.insert(
                        candidate.key.clone(),
                        StageEntry::modified(
                            candidate.key.clone(),
                            candidate.name.clone(),
                            blob,
                            candidate.document.clone(),
                        ),
                    );
                }
                None => {
                    unstaged.insert(
                        candidate.key.clone(),
                        StageEntry::added(
                            candidate.key.clone(),
                            candidate.name.clone(),
                            blob,
                            candidate.document.clone(),
                        ),
                    );
                }
            }
        }

        // Committed documents that vanished from the live set and are not
        // staged (as a delete or anything else) are pending deletes.
        let candidate_keys: HashSet<&str> =
            candidates.iter().map(|c| c.key.as_str()).collect();
        for (key, committed) in &state {
            if candidate_keys.contains(key.as_str()) || stage.contains_key(key) {
                continue;
            }
            unstaged.insert(
                key.clone(),
                StageEntry::deleted(key.clone(), committed.name.clone()),
            );
        }

        Ok(Status { stage, unstaged })
    }

    /// Persist the given entries into the stage.
    ///
    /// Add/modify content is written to the blob store first (idempotent:
    /// identical content always maps to the identical key); entries then
    /// merge into the persisted stage keyed by document key, last write
    /// wins.
    pub async fn stage(&self, entries: Vec<StageEntry>) -> StatusResult<Stage> {
        let mut stage = self.meta.stage().await?;
        for mut entry in entries {
            if let Some(content) = &entry.content {
                entry.blob = self.blobs.put(content).await?;
            }
            stage.insert(entry);
        }
        self.meta.write_stage(&stage).await?;
        debug!(entries = stage.len(), "stage updated");
        Ok(stage)
    }

    /// Remove matching keys from the stage.
    pub async fn unstage(&self, keys: &[DocumentKey]) -> StatusResult<Stage> {
        let mut stage = self.meta.stage().await?;
        for key in keys {
            stage.remove(key);
        }
        self.meta.write_stage(&stage).await?;
        Ok(stage)
    }
}
