//! Persisted local state.
//!
//! A string key-value store used for session survival across restarts and
//! cached preferences. Batch operations are fail-stop: either every pair is
//! written or the call fails and nothing changes.

use async_trait::async_trait;

use crate::error::Result;

/// Storage keys used by the client.
pub mod keys {
    pub const SESSION: &str = "gymflow.auth.session";
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    async fn clear(&self) -> Result<()>;

    /// Values in the order of `keys`; missing keys map to `None`.
    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<Option<String>>>;

    async fn multi_set(&self, pairs: &[(&str, &str)]) -> Result<()>;

    async fn multi_remove(&self, keys: &[&str]) -> Result<()>;
}
