use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Number of lowercase hex characters in a rendered id.
pub const HEX_LEN: usize = 40;

/// Content-addressed identifier for any stored object.
///
/// An `ObjectId` is the SHA-1 digest of an object's canonical serialization,
/// rendered as 40 lowercase hex characters. Identical content always produces
/// the same `ObjectId`, making blobs deduplicatable by construction and
/// letting independent clients converge to identical snapshot ids.
///
/// The all-zero id ([`ObjectId::zero`]) is a sentinel: it is the parent of a
/// history's first snapshot and the "no blob" marker on delete entries. No
/// content is ever stored under it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 20]);

impl ObjectId {
    /// Create an `ObjectId` from a pre-computed 20-byte digest.
    pub const fn from_digest(digest: [u8; 20]) -> Self {
        Self(digest)
    }

    /// The empty sentinel id (40 zero chars). Represents "no object".
    pub const fn zero() -> Self {
        Self([0u8; 20])
    }

    /// Returns `true` if this is the empty sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// The raw 20-byte digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Hex-encoded string representation (40 lowercase chars).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a 40-char hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        if s.len() != HEX_LEN {
            return Err(TypeError::InvalidLength {
                expected: HEX_LEN,
                actual: s.len(),
            });
        }
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let mut digest = [0u8; 20];
        digest.copy_from_slice(&bytes);
        Ok(Self(digest))
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for ObjectId {
    fn from(digest: [u8; 20]) -> Self {
        Self(digest)
    }
}

// Ids live inside JSON metadata and wire payloads, so they serialize as hex
// strings rather than byte arrays.
impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}
