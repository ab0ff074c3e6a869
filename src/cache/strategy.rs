//! Cache Strategy Module
//!
//! The capability contract every cache backend implements.

use async_trait::async_trait;

use crate::cache::CacheValue;
use crate::error::Result;

// == Cache Strategy ==
/// Async get/set/delete contract shared by all cache backends.
///
/// Missing keys are never errors: `get` returns `Ok(None)` and `delete` is a
/// no-op. `ttl` is in seconds; `None` means the entry never expires and a
/// value of zero or less means it is already gone on the next read.
///
/// The trait is object safe so callers can hold an `Arc<dyn CacheStrategy>`
/// and swap backends without touching call sites.
#[async_trait]
pub trait CacheStrategy: Send + Sync {
    /// Returns the value stored under `key`, or None if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<CacheValue>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()>;

    /// Removes `key` if present.
    async fn delete(&self, key: &str) -> Result<()>;
}
