use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info};

use folio_history::{BranchEngine, SnapshotEngine};
use folio_store::MetadataStore;
use folio_types::{DocumentKey, ObjectId, Snapshot, StatusCandidate};

use crate::error::{MergeError, MergeResult};
use crate::precheck::{pre_merge_check, PreMergeReport};
use crate::three_way::three_way_merge;

/// Outcome of merging another branch into the current one.
#[derive(Clone, Debug)]
pub enum MergeOutcome {
    /// The current branch's history was replaced by the other branch's; no
    /// new snapshot was created.
    FastForward,
    /// A three-way merge produced a new snapshot.
    Merged {
        /// The merge commit.
        snapshot: Snapshot,
        /// Keys where the two sides changed incompatibly.
        conflicts: Vec<DocumentKey>,
        /// Unsaved live edits classified before the merge.
        precheck: PreMergeReport,
    },
}

/// Reconciles the current branch with another branch's history.
#[derive(Clone, Debug)]
pub struct MergeEngine {
    meta: MetadataStore,
    branches: BranchEngine,
    snapshots: SnapshotEngine,
}

impl MergeEngine {
    pub fn new(meta: MetadataStore, branches: BranchEngine, snapshots: SnapshotEngine) -> Self {
        Self {
            meta,
            branches,
            snapshots,
        }
    }

    /// Merge `other_name` into the current branch.
    ///
    /// Locates the common ancestor by scanning the current history tip-
    /// backward for the first id the other branch also holds. Fast-forwards
    /// when the ancestor is the current tip; fails with
    /// [`MergeError::AlreadyMerged`] when it is the other tip; otherwise
    /// runs the three-way table and commits the result as
    /// `"Merged branch <other_name>"` parented on the current tip.
    ///
    /// `candidates` are the caller's live documents; unsaved edits among
    /// them are classified by [`pre_merge_check`] and returned in the
    /// outcome so the caller can warn about work the merge would overwrite.
    pub async fn merge(
        &self,
        candidates: &[StatusCandidate],
        other_name: &str,
    ) -> MergeResult<MergeOutcome> {
        let mut trunk = self.branches.current().await?;
        let other = self.branches.branch_required(other_name).await?;

        let other_ids: HashSet<ObjectId> = other.snapshots.iter().copied().collect();
        let root = trunk
            .snapshots
            .iter()
            .rev()
            .find(|id| other_ids.contains(id))
            .copied();
        let Some(root) = root else {
            return Err(MergeError::UnrelatedHistory {
                trunk: trunk.name,
                other: other.name,
            });
        };
        debug!(root = %root.short_hex(), "located merge root");

        if trunk.tip() == Some(root) {
            // The current history is a prefix of the other's: adopt it.
            trunk.snapshots = other.snapshots.clone();
            trunk.modified = Utc::now();
            self.meta.write_branch(&trunk).await?;
            info!(branch = %trunk.name, from = other_name, "fast-forwarded");
            return Ok(MergeOutcome::FastForward);
        }
        if other.tip() == Some(root) {
            return Err(MergeError::AlreadyMerged(other.name));
        }

        let trunk_tip = trunk.tip().unwrap_or_else(ObjectId::zero);
        let other_tip = other.tip().unwrap_or_else(ObjectId::zero);
        let root_state = self.snapshots.state_of(&root).await?;
        let trunk_state = self.snapshots.state_of(&trunk_tip).await?;
        let other_state = self.snapshots.state_of(&other_tip).await?;

        let precheck = pre_merge_check(&trunk_state, &other_state, candidates);
        let merged = three_way_merge(&root_state, &trunk_state, &other_state);

        let snapshot = self
            .snapshots
            .commit_state(&format!("Merged branch {other_name}"), merged.state)
            .await?;
        info!(
            branch = %trunk.name,
            from = other_name,
            conflicts = merged.conflicts.len(),
            "merged branch"
        );
        Ok(MergeOutcome::Merged {
            snapshot,
            conflicts: merged.conflicts,
            precheck,
        })
    }
}
