//! Port interface for simple persistent key-value storage

use async_trait::async_trait;
use vioshop_domain::Result;

/// Trait for string key-value persistence
///
/// Each `set` replaces the whole value for `key` in one step; readers never
/// observe a partially written value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` when absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}
