use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvDriver;

/// In-memory, BTreeMap-based key-value driver.
///
/// Intended for tests and embedding. Values are stored as serialized JSON
/// bytes behind a `RwLock`; the sorted map makes prefix scans cheap and
/// `keys` deterministic.
pub struct MemoryDriver {
    items: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryDriver {
    /// Create a new empty driver.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of paths currently stored.
    pub fn len(&self) -> usize {
        self.items.read().expect("lock poisoned").len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.read().expect("lock poisoned").is_empty()
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.items.write().expect("lock poisoned").clear();
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvDriver for MemoryDriver {
    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        let map = self.items.read().expect("lock poisoned");
        match map.get(path) {
            Some(bytes) => {
                let value = serde_json::from_slice(bytes)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn get_raw(&self, path: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.items.read().expect("lock poisoned");
        Ok(map.get(path).cloned())
    }

    async fn set(&self, path: &str, value: &Value) -> StoreResult<()> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut map = self.items.write().expect("lock poisoned");
        map.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, path: &str) -> StoreResult<()> {
        let mut map = self.items.write().expect("lock poisoned");
        map.remove(path);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let map = self.items.read().expect("lock poisoned");
        Ok(map
            .range(prefix.to_string()..)
            .take_while(|(path, _)| path.starts_with(prefix))
            .map(|(path, _)| path.clone())
            .collect())
    }
}

impl std::fmt::Debug for MemoryDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDriver")
            .field("path_count", &self.len())
            .finish()
    }
}
