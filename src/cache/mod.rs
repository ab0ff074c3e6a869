//! Cache Module
//!
//! Pluggable async cache strategies behind a single façade:
//! - [`MemoryCache`]: bounded in-process store with TTL and FIFO eviction
//! - [`RedisCache`]: remote store delegating expiration to Redis
//! - [`CacheManager`]: forwards to whichever strategy it was built with

mod entry;
mod manager;
mod memory;
mod order;
mod remote;
mod stats;
mod strategy;


// Re-export public types
pub use entry::CacheEntry;
pub use manager::CacheManager;
pub use memory::{MemoryCache, DEFAULT_MAXSIZE};
pub use order::InsertionOrder;
pub use remote::RedisCache;
pub use stats::CacheStats;
pub use strategy::CacheStrategy;

/// Any JSON-representable value can be cached.
pub type CacheValue = serde_json::Value;

// == Public Constants ==
/// Maximum allowed key length in bytes (enforced by the HTTP layer)
pub const MAX_KEY_LENGTH: usize = 256;
