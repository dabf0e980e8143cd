use std::collections::BTreeMap;

use folio_types::{DocumentKey, Stage, StageEntry};

/// Result of a status computation: the persisted stage plus the changes not
/// yet staged.
///
/// A key may legitimately appear in both maps (its staged value differs
/// from the current live value), mirroring the staged vs. working-tree
/// duality.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Status {
    /// The persisted stage as it stands.
    pub stage: Stage,
    /// Changes present in the live candidates (or implied by their absence)
    /// but not yet staged, keyed by document key.
    pub unstaged: BTreeMap<DocumentKey, StageEntry>,
}

impl Status {
    /// Returns `true` if nothing is staged and nothing is pending.
    pub fn is_clean(&self) -> bool {
        self.stage.is_empty() && self.unstaged.is_empty()
    }

    /// Returns `true` if there are staged changes ready to commit.
    pub fn has_staged_changes(&self) -> bool {
        !self.stage.is_empty()
    }

    /// Total number of entries across both maps.
    pub fn total_entries(&self) -> usize {
        self.stage.len() + self.unstaged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::StageEntry;

    #[test]
    fn empty_status_is_clean() {
        let status = Status::default();
        assert!(status.is_clean());
        assert!(!status.has_staged_changes());
        assert_eq!(status.total_entries(), 0);
    }

    #[test]
    fn unstaged_entry_makes_status_dirty() {
        let mut status = Status::default();
        status
            .unstaged
            .insert("doc".into(), StageEntry::deleted("doc", "Doc"));
        assert!(!status.is_clean());
        assert_eq!(status.total_entries(), 1);
    }
}
