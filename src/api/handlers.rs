//! API Handlers
//!
//! HTTP request handlers that reach the cache only through the façade.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{Map, Value};

use crate::cache::{CacheManager, MemoryCache, RedisCache};
use crate::config::{CacheBackend, Config};
use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, KeyResponse, SetRequest, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Façade every handler goes through
    pub cache: CacheManager,
    /// Direct handle on the in-process store, for stats and sweeping
    pub memory: Option<Arc<MemoryCache>>,
    /// Which strategy the façade was built with
    pub backend: CacheBackend,
    /// TTL applied when a SET request carries none
    pub default_ttl: Option<i64>,
    /// Lifespan states, reported by /health
    pub states: Option<Map<String, Value>>,
}

impl AppState {
    /// Creates state over an in-process store.
    pub fn memory(store: MemoryCache) -> Self {
        let store = Arc::new(store);
        Self {
            cache: CacheManager::from_arc(store.clone()),
            memory: Some(store),
            backend: CacheBackend::Memory,
            default_ttl: None,
            states: None,
        }
    }

    /// Creates state over a Redis server.
    pub fn redis(store: RedisCache) -> Self {
        Self {
            cache: CacheManager::new(store),
            memory: None,
            backend: CacheBackend::Redis,
            default_ttl: None,
            states: None,
        }
    }

    /// Creates the state described by the configuration.
    ///
    /// Fails only if the Redis URL is malformed.
    pub fn from_config(config: &Config) -> Result<Self> {
        let state = match config.backend {
            CacheBackend::Memory => Self::memory(MemoryCache::new(config.maxsize)),
            CacheBackend::Redis => Self::redis(RedisCache::new(&config.redis_url)?),
        };
        Ok(state.with_default_ttl(config.default_ttl))
    }

    pub fn with_default_ttl(mut self, ttl: Option<i64>) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_states(mut self, states: Option<Map<String, Value>>) -> Self {
        self.states = states;
        self
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl.or(state.default_ttl);
    state.cache.set(&req.key, req.value, ttl).await?;

    Ok(Json(KeyResponse::stored(req.key)))
}

/// Handler for GET /get/:key
///
/// Absent and expired keys are both reported as 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
///
/// Idempotent: deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    state.cache.delete(&key).await?;

    Ok(Json(KeyResponse::deleted(key)))
}

/// Handler for GET /stats
///
/// Only the in-process store keeps statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let store = state.memory.as_ref().ok_or_else(|| {
        CacheError::Unsupported(format!(
            "the {} backend does not track statistics",
            state.backend.as_str()
        ))
    })?;

    let stats = store.stats().await;
    Ok(Json(StatsResponse::new(&stats, store.maxsize())))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = HealthResponse::healthy(state.backend.as_str());
    Json(response.with_states(state.states.clone()))
}
