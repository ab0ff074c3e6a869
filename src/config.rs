//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::DEFAULT_MAXSIZE;

/// Which cache strategy the server wires into its façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Bounded in-process store
    Memory,
    /// Remote Redis server
    Redis,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache strategy to use
    pub backend: CacheBackend,
    /// Maximum number of entries the in-process store can hold
    pub maxsize: usize,
    /// Redis server URL, used by the redis backend
    pub redis_url: String,
    /// TTL in seconds applied when a request carries none; None = no expiry
    pub default_ttl: Option<i64>,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds (memory backend only)
    pub cleanup_interval: u64,
    /// Deadline applied separately to startup and shutdown
    pub lifespan_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `CACHE_MAXSIZE` - Maximum in-process entries (default: 100)
    /// - `REDIS_URL` - Redis server URL (default: redis://127.0.0.1:6379/)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: unset, no expiry)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    /// - `LIFESPAN_TIMEOUT` - Startup/shutdown deadline in seconds (default: unset; 0 = unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            maxsize: parse_var("CACHE_MAXSIZE").unwrap_or(defaults.maxsize),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            default_ttl: parse_var("DEFAULT_TTL").or(defaults.default_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            lifespan_timeout: parse_var::<u64>("LIFESPAN_TIMEOUT")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .or(defaults.lifespan_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            maxsize: DEFAULT_MAXSIZE,
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            default_ttl: None,
            server_port: 3000,
            cleanup_interval: 1,
            lifespan_timeout: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.maxsize, 100);
        assert_eq!(config.default_ttl, None);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 1);
        assert_eq!(config.lifespan_timeout, None);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment to avoid races between tests
        for name in [
            "CACHE_BACKEND",
            "CACHE_MAXSIZE",
            "REDIS_URL",
            "DEFAULT_TTL",
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
            "LIFESPAN_TIMEOUT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.backend, CacheBackend::Memory);
        assert_eq!(config.maxsize, 100);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379/");

        env::set_var("CACHE_BACKEND", "Redis");
        env::set_var("CACHE_MAXSIZE", "not-a-number");
        env::set_var("LIFESPAN_TIMEOUT", "5");
        env::set_var("DEFAULT_TTL", "60");

        let config = Config::from_env();
        assert_eq!(config.backend, CacheBackend::Redis);
        assert_eq!(config.maxsize, 100);
        assert_eq!(config.lifespan_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.default_ttl, Some(60));

        env::set_var("LIFESPAN_TIMEOUT", "0");
        assert_eq!(Config::from_env().lifespan_timeout, None);

        for name in ["CACHE_BACKEND", "CACHE_MAXSIZE", "LIFESPAN_TIMEOUT", "DEFAULT_TTL"] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("memory".parse::<CacheBackend>(), Ok(CacheBackend::Memory));
        assert_eq!(" REDIS ".parse::<CacheBackend>(), Ok(CacheBackend::Redis));
        assert!("memcached".parse::<CacheBackend>().is_err());
    }
}
