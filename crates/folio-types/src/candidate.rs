use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A caller-supplied live document value, compared against committed and
/// staged state by the status engine. The document payload is opaque JSON;
/// the engine only ever inspects its canonical serialization and hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCandidate {
    /// Document key.
    pub key: String,
    /// Human-readable document name.
    pub name: String,
    /// The live document value.
    pub document: Value,
}

impl StatusCandidate {
    pub fn new(key: impl Into<String>, name: impl Into<String>, document: Value) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            document,
        }
    }
}
