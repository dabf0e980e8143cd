use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;

/// Durable key-value driver: the engine's only storage dependency.
///
/// All implementations must satisfy these invariants:
/// - The namespace is flat. Paths are opaque strings; the driver never
///   interprets them beyond prefix matching in [`keys`].
/// - Values are opaque JSON. The driver never inspects their shape.
/// - Writes are last-write-wins; `set` on an existing path overwrites.
/// - `get`/`get_raw` return `Ok(None)` for absent paths, never an error.
/// - All I/O errors are propagated, never silently ignored.
///
/// Every method is a suspension point: drivers perform real I/O, the engine
/// takes no locks, and callers must serialize mutating operations against a
/// given project themselves.
///
/// [`keys`]: KvDriver::keys
#[async_trait]
pub trait KvDriver: Send + Sync {
    /// Read the value at `path`. Returns `Ok(None)` if the path is absent.
    async fn get(&self, path: &str) -> StoreResult<Option<Value>>;

    /// Read the raw stored bytes at `path`.
    ///
    /// The byte encoding is driver-defined; callers needing deterministic
    /// bytes re-canonicalize the decoded value instead.
    async fn get_raw(&self, path: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` at `path`, overwriting any existing value.
    async fn set(&self, path: &str, value: &Value) -> StoreResult<()>;

    /// Remove the value at `path`. Removing an absent path is a no-op.
    async fn remove(&self, path: &str) -> StoreResult<()>;

    /// All paths starting with `prefix`, in ascending order.
    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;
}
