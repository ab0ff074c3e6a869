//! Cache Manager Module
//!
//! The façade callers depend on instead of a concrete strategy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{CacheStrategy, CacheValue};
use crate::error::Result;

// == Cache Manager ==
/// Holds one cache strategy and forwards every call to it unchanged.
///
/// Cloning is cheap and shares the underlying strategy, so a manager can be
/// handed to request handlers as application state.
#[derive(Clone)]
pub struct CacheManager {
    strategy: Arc<dyn CacheStrategy>,
}

impl CacheManager {
    /// Wraps `strategy`.
    pub fn new<S>(strategy: S) -> Self
    where
        S: CacheStrategy + 'static,
    {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    /// Wraps an already shared strategy, e.g. a store the caller also keeps
    /// a handle to for maintenance.
    pub fn from_arc(strategy: Arc<dyn CacheStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &Arc<dyn CacheStrategy> {
        &self.strategy
    }

    pub async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        self.strategy.get(key).await
    }

    pub async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        self.strategy.set(key, value, ttl).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.strategy.delete(key).await
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager").finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheStrategy for CacheManager {
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        CacheManager::get(self, key).await
    }

    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        CacheManager::set(self, key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        CacheManager::delete(self, key).await
    }
}
