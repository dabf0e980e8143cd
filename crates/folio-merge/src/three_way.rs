//! The three-way merge decision table.
//!
//! Compares the common-ancestor manifest (`root`) with the two divergent
//! tips (`trunk` is the current branch, `other` the branch being merged in)
//! per document key. Every key resolves to a deterministic outcome; keys
//! where both sides changed incompatibly additionally land in the conflict
//! list, with the merged state keeping a definite winner so callers can
//! apply their own resolution policy afterwards.

use std::collections::{BTreeMap, BTreeSet};

use folio_types::{DocumentKey, SnapshotStateEntry};

/// Result of a three-way merge: the merged manifest plus the keys where the
/// two sides diverged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedState {
    /// Merged manifest, sorted by key.
    pub state: Vec<SnapshotStateEntry>,
    /// Keys where trunk and other changed incompatibly.
    pub conflicts: Vec<DocumentKey>,
}

fn by_key(entries: &[SnapshotStateEntry]) -> BTreeMap<&str, &SnapshotStateEntry> {
    entries.iter().map(|e| (e.key.as_str(), e)).collect()
}

/// Merge `trunk` and `other` against their common ancestor `root`.
///
/// Per key, with presence and blob equality relative to the root:
///
/// | root    | trunk             | other             | outcome                         |
/// |---------|-------------------|-------------------|---------------------------------|
/// | present | = root            | = root            | keep, unmodified                |
/// | present | absent            | absent            | drop (deleted on both sides)    |
/// | present | absent            | = root            | drop (deleted in trunk)         |
/// | present | = root            | absent            | drop (deleted in other)         |
/// | present | ≠ root            | = root            | keep trunk (modified in trunk)  |
/// | present | = root            | ≠ root            | keep other (modified in other)  |
/// | present | ≠ root            | ≠ root, ≠ trunk   | conflict, keep trunk            |
/// | present | absent            | ≠ root            | conflict, keep other            |
/// | present | ≠ root            | absent            | conflict, keep trunk            |
/// | absent  | present           | absent            | keep trunk (added in trunk)     |
/// | absent  | absent            | present           | keep other (added in other)     |
/// | absent  | present           | present, ≠ trunk  | conflict, keep trunk            |
///
/// Two sides that made the identical change (same blob) merge cleanly.
pub fn three_way_merge(
    root: &[SnapshotStateEntry],
    trunk: &[SnapshotStateEntry],
    other: &[SnapshotStateEntry],
) -> MergedState {
    let root_map = by_key(root);
    let trunk_map = by_key(trunk);
    let other_map = by_key(other);

    let keys: BTreeSet<&str> = root_map
        .keys()
        .chain(trunk_map.keys())
        .chain(other_map.keys())
        .copied()
        .collect();

    let mut merged = MergedState::default();
    for key in keys {
        let r = root_map.get(key).copied();
        let t = trunk_map.get(key).copied();
        let o = other_map.get(key).copied();

        let (keep, conflict) = decide(r, t, o);
        if let Some(entry) = keep {
            merged.state.push(entry.clone());
        }
        if conflict {
            merged.conflicts.push(key.to_string());
        }
    }
    merged
}

/// One row of the table: which entry survives, and whether the key
/// conflicts.
fn decide<'a>(
    root: Option<&'a SnapshotStateEntry>,
    trunk: Option<&'a SnapshotStateEntry>,
    other: Option<&'a SnapshotStateEntry>,
) -> (Option<&'a SnapshotStateEntry>, bool) {
    match (root, trunk, other) {
        // Key existed at the root.
        (Some(r), Some(t), Some(o)) => {
            let trunk_changed = t.blob != r.blob;
            let other_changed = o.blob != r.blob;
            match (trunk_changed, other_changed) {
                (false, false) => (Some(t), false),
                (true, false) => (Some(t), false),
                (false, true) => (Some(o), false),
                // Both changed: clean when identical, trunk wins otherwise.
                (true, true) => (Some(t), t.blob != o.blob),
            }
        }
        (Some(_), None, None) => (None, false),
        (Some(r), None, Some(o)) => {
            if o.blob == r.blob {
                // Deleted in trunk, untouched in other.
                (None, false)
            } else {
                // Deleted in trunk but modified in other.
                (Some(o), true)
            }
        }
        (Some(r), Some(t), None) => {
            if t.blob == r.blob {
                // Untouched in trunk, deleted in other.
                (None, false)
            } else {
                // Modified in trunk but deleted in other.
                (Some(t), true)
            }
        }

        // Key did not exist at the root.
        (None, Some(t), Some(o)) => (Some(t), t.blob != o.blob),
        (None, Some(t), None) => (Some(t), false),
        (None, None, Some(o)) => (Some(o), false),
        (None, None, None) => (None, false),
    }
}
