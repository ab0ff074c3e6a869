//! Remote Cache Module
//!
//! Remote cache strategy that proxies to a Redis server. Expiration is left
//! entirely to the server.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;

use crate::cache::{CacheStrategy, CacheValue};
use crate::error::Result;

// == Redis Cache ==
/// Cache strategy backed by a Redis server.
///
/// Values are stored as JSON text. The connection is opened on first use and
/// shared by every later call; failures are returned to the caller as
/// [`CacheError::Connection`](crate::error::CacheError::Connection) without
/// any retry.
pub struct RedisCache {
    client: Client,
    connection: OnceCell<MultiplexedConnection>,
}

impl RedisCache {
    // == Constructor ==
    /// Creates a strategy for the server at `url` (e.g. `redis://127.0.0.1:6379/`).
    ///
    /// Only the URL is validated here; no connection is made until the first
    /// cache operation.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::open(url)?,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let conn = self
            .connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await?;
        Ok(conn.clone())
    }
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("connected", &self.connection.initialized())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheStrategy for RedisCache {
    // == Get ==
    /// Checks existence first, then fetches and decodes the value.
    async fn get(&self, key: &str) -> Result<Option<CacheValue>> {
        let mut conn = self.connection().await?;

        let exists: bool = conn.exists(key).await?;
        if !exists {
            return Ok(None);
        }

        // The key may still expire between EXISTS and GET
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    // == Set ==
    async fn set(&self, key: &str, value: CacheValue, ttl: Option<i64>) -> Result<()> {
        let payload = serde_json::to_string(&value)?;
        let mut conn = self.connection().await?;

        match ttl {
            None => {
                let _: () = conn.set(key, payload).await?;
            }
            Some(seconds) if seconds > 0 => {
                let _: () = conn.set_ex(key, payload, seconds as u64).await?;
            }
            // SETEX rejects non-positive expirations; the entry is gone immediately
            Some(_) => {
                let _: () = conn.del(key).await?;
            }
        }

        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
