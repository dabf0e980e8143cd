//! Unsaved-work check run before a merge.
//!
//! Live candidates may carry edits that no commit on either side reflects.
//! Those that can be safely carried across the merge are reported as dirty;
//! those the merged state would overwrite are reported as pre-existing
//! conflicts, so the caller can warn *before* the merge proceeds.

use std::collections::BTreeMap;

use folio_hash::hash_document;
use folio_types::{DocumentKey, SnapshotStateEntry, StatusCandidate};

/// Classification of live candidates against the two merge sides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreMergeReport {
    /// Unsaved edits that survive the merge untouched.
    pub dirty: Vec<DocumentKey>,
    /// Unsaved edits the merged state would overwrite.
    pub conflicts: Vec<DocumentKey>,
}

impl PreMergeReport {
    /// Returns `true` if no unsaved edit is endangered.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Classify each live candidate against the trunk and other manifests.
///
/// A candidate already committed on both sides is skipped. One that matches
/// a single side, or that is new to both, is dirty (safely carried forward).
/// Anything else, content differing from both sides while at least one side
/// tracks the key, is a pre-existing conflict.
pub fn pre_merge_check(
    trunk: &[SnapshotStateEntry],
    other: &[SnapshotStateEntry],
    candidates: &[StatusCandidate],
) -> PreMergeReport {
    let trunk_map: BTreeMap<&str, &SnapshotStateEntry> =
        trunk.iter().map(|e| (e.key.as_str(), e)).collect();
    let other_map: BTreeMap<&str, &SnapshotStateEntry> =
        other.iter().map(|e| (e.key.as_str(), e)).collect();

    let mut report = PreMergeReport::default();
    for candidate in candidates {
        let blob = hash_document(&candidate.document);
        let trunk_entry = trunk_map.get(candidate.key.as_str());
        let other_entry = other_map.get(candidate.key.as_str());

        let matches_trunk = trunk_entry.is_some_and(|e| e.blob == blob);
        let matches_other = other_entry.is_some_and(|e| e.blob == blob);

        if matches_trunk && matches_other {
            continue;
        }
        if matches_trunk || matches_other {
            report.dirty.push(candidate.key.clone());
        } else if trunk_entry.is_none() && other_entry.is_none() {
            report.dirty.push(candidate.key.clone());
        } else {
            report.conflicts.push(candidate.key.clone());
        }
    }
    report
}
