//! mctools - pluggable async caching and application lifespan helpers
//!
//! Provides interchangeable cache strategies (bounded in-process store,
//! Redis) behind a single façade, and a startup/shutdown event runner.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lifespan;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheManager, CacheStrategy, MemoryCache, RedisCache};
pub use config::Config;
pub use error::{CacheError, LifespanError};
pub use lifespan::{Event, Lifespan, Phase};
pub use tasks::spawn_cleanup_task;
