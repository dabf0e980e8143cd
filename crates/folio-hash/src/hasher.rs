use serde_json::Value;
use sha1::{Digest, Sha1};

use folio_types::ObjectId;

use crate::canonical::canonical_json;

/// SHA-1 digest of raw bytes.
pub fn hash_bytes(data: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(data);
    ObjectId::from_digest(hasher.finalize().into())
}

/// Content hash of a document: SHA-1 over its canonical serialization.
///
/// Stable across runs and independent of key insertion order. Malformed or
/// unusually shaped content is not an error; whatever the value is, it
/// canonicalizes and hashes.
pub fn hash_document(document: &Value) -> ObjectId {
    hash_bytes(&canonical_json(document))
}

/// Deterministic snapshot identity.
///
/// `sha1(project ‖ parent_hex ‖ sorted_ascending(blob hexes))`. Sorting makes
/// the id independent of manifest order, so logically identical content
/// always hashes identically regardless of staging sequence, and identical
/// histories built by independent clients converge to identical ids.
pub fn snapshot_id(project: &str, parent: &ObjectId, blobs: &[ObjectId]) -> ObjectId {
    let mut hexes: Vec<String> = blobs.iter().map(ObjectId::to_hex).collect();
    hexes.sort();

    let mut hasher = Sha1::new();
    hasher.update(project.as_bytes());
    hasher.update(parent.to_hex().as_bytes());
    for hex in &hexes {
        hasher.update(hex.as_bytes());
    }
    ObjectId::from_digest(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Map};

    #[test]
    fn sha1_known_vector() {
        // SHA-1 of the empty string.
        assert_eq!(
            hash_bytes(b"").to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn document_hash_is_deterministic() {
        let doc = json!({"id": "bar", "nested": {"a": [1, 2, 3]}});
        assert_eq!(hash_document(&doc), hash_document(&doc));
    }

    #[test]
    fn document_hash_ignores_insertion_order() {
        let mut forward = Map::new();
        forward.insert("a".into(), json!(1));
        forward.insert("b".into(), json!(2));

        let mut reverse = Map::new();
        reverse.insert("b".into(), json!(2));
        reverse.insert("a".into(), json!(1));

        assert_eq!(
            hash_document(&Value::Object(forward)),
            hash_document(&Value::Object(reverse))
        );
    }

    #[test]
    fn different_documents_hash_differently() {
        assert_ne!(
            hash_document(&json!({"a": 1})),
            hash_document(&json!({"a": 2}))
        );
    }

    #[test]
    fn snapshot_id_is_order_independent() {
        let blobs = vec![
            hash_bytes(b"one"),
            hash_bytes(b"two"),
            hash_bytes(b"three"),
        ];
        let mut reversed = blobs.clone();
        reversed.reverse();

        let parent = ObjectId::zero();
        assert_eq!(
            snapshot_id("proj", &parent, &blobs),
            snapshot_id("proj", &parent, &reversed)
        );
    }

    #[test]
    fn snapshot_id_depends_on_parent_and_project() {
        let blobs = vec![hash_bytes(b"doc")];
        let root = snapshot_id("proj", &ObjectId::zero(), &blobs);
        let child = snapshot_id("proj", &root, &blobs);
        assert_ne!(root, child);
        assert_ne!(root, snapshot_id("other", &ObjectId::zero(), &blobs));
    }

    proptest! {
        #[test]
        fn prop_hash_stable_under_key_insertion_order(pairs in proptest::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..8)) {
            let mut forward = Map::new();
            for (k, v) in &pairs {
                forward.insert(k.clone(), json!(v));
            }
            let mut reverse = Map::new();
            for (k, v) in pairs.iter().rev() {
                reverse.insert(k.clone(), json!(v));
            }
            prop_assert_eq!(
                hash_document(&Value::Object(forward)),
                hash_document(&Value::Object(reverse))
            );
        }

        #[test]
        fn prop_hash_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(hash_bytes(&bytes), hash_bytes(&bytes));
        }
    }
}
