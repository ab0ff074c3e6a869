//! Memory Cache Module
//!
//! Bounded in-process store combining HashMap storage with FIFO eviction and
//! lazy TTL expiration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats, CacheStrategy, CacheValue, InsertionOrder};
use crate::error::Result;

/// Capacity used by [`MemoryCache::default`].
pub const DEFAULT_MAXSIZE: usize = 100;

// == Memory State ==
/// Everything guarded by the store's lock.
#[derive(Debug, Default)]
struct MemoryState {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Write order, oldest first
    order: InsertionOrder,
    /// Performance statistics
    stats: CacheStats,
}

impl MemoryState {
    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.remove(key);
        }
        removed
    }

    fn sync_total(&mut self) {
        self.stats.set_total_entries(self.entries.len());
    }
}

// == Memory Cache ==
/// In-process cache strategy holding at most `maxsize` entries.
///
/// When full, a write of a new key evicts the oldest written key first.
/// Overwriting an existing key refreshes its position in the eviction queue.
/// Expired entries are dropped lazily by `get` (and in bulk by
/// [`purge_expired`](Self::purge_expired)).
///
/// All reads and writes go through a single async mutex; the current time is
/// read inside the critical section so check-then-mutate sequences are atomic
/// with respect to other callers.
#[derive(Debug)]
pub struct MemoryCache {
    state: Mutex<MemoryState>,
    maxsize: usize,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates an empty store that holds at most `maxsize` entries.
    ///
    /// A `maxsize` of zero yields a store that never retains anything.
    pub fn new(maxsize: usize) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            maxsize,
        }
    }

    /// Returns the capacity bound.
    pub fn maxsize(&self) -> usize {
        self.maxsize
    }

    /// Returns the number of stored entries, expired ones included until
    /// they are read or purged.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub async fn stats(&self) -> CacheStats {
        let mut state = self.state.lock().await;
        state.sync_total();
        state.stats.clone()
    }

    // == Purge Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.remove(key);
        }

        state.stats.record_expirations(expired.len());
        state.sync_total();
        expired.len()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAXSIZE)
    }
}

#[async_trait]
impl CacheStrategy for MemoryCache {
    // == Get ==
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let mut state = self.state.lock().await;
        let now = Instant::now();

        let (value, expired) = match state.entries.get(key) {
            None => (None, false),
            Some(entry) if entry.is_expired_at(now) => (None, true),
            Some(entry) => (Some(entry.value.clone()), false),
        };

        if expired {
            state.remove(key);
            state.stats.record_expirations(1);
            state.sync_total();
        }

        state.stats.record_lookup(value.is_some());

        Ok(value)
    }

    // == Set ==
    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        if self.maxsize == 0 {
            return Ok(());
        }

        let mut state = self.state.lock().await;
        let entry = CacheEntry::new(value, ttl, Instant::now());

        // Overwrites are remove-then-insert, so they never push out another key
        state.remove(key);

        if state.entries.len() >= self.maxsize {
            if let Some(oldest) = state.order.pop_oldest() {
                state.entries.remove(&oldest);
                state.stats.record_eviction();
            }
        }

        state.entries.insert(key.to_string(), entry);
        state.order.record(key);
        state.sync_total();

        debug_assert_eq!(state.entries.len(), state.order.len());
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.remove(key).is_some() {
            state.sync_total();
        }
        Ok(())
    }
}
