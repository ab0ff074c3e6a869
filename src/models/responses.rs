//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cache::{CacheStats, CacheValue};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: CacheValue,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: CacheValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Acknowledgement for SET and DELETE (PUT /set, DELETE /del/:key)
///
/// Deleting an absent key is still acknowledged.
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    pub message: String,
    pub key: String,
}

impl KeyResponse {
    pub fn stored(key: impl Into<String>) -> Self {
        Self::with_verb(key.into(), "set")
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        Self::with_verb(key.into(), "deleted")
    }

    fn with_verb(key: String, verb: &str) -> Self {
        Self {
            message: format!("Key '{}' {} successfully", key, verb),
            key,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub maxsize: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Builds the response from a stats snapshot and the store capacity
    pub fn new(stats: &CacheStats, maxsize: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            maxsize,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Configured cache backend
    pub backend: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Lifespan states published at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Map<String, Value>>,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(backend: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            backend: backend.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            states: None,
        }
    }

    pub fn with_states(mut self, states: Option<Map<String, Value>>) -> Self {
        self.states = states;
        self
    }
}
