//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache of keyword lookups.
///
/// Links are stored as JSON under `link:<keyword>`. Reads and writes are
/// fail-open: backend errors are logged and reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "link:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, keyword: &str) -> String {
        format!("{}{}", self.key_prefix, keyword)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, keyword: &str) -> CacheResult<Option<Link>> {
        let key = self.build_key(keyword);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Link>(&raw) {
                Ok(link) => {
                    debug!("Cache HIT: {}", keyword);
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry for {}: {}", keyword, e);
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!("Cache MISS: {}", keyword);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", keyword, e);
                Ok(None)
            }
        }
    }

    async fn set_link(&self, keyword: &str, link: &Link, ttl: Option<u64>) -> CacheResult<()> {
        let key = self.build_key(keyword);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl.unwrap_or(self.default_ttl);

        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::SerializationError(e.to_string()))?;

        match conn.set_ex::<_, _, ()>(&key, payload, ttl_seconds).await {
            Ok(_) => {
                debug!("Cache SET: {} (TTL: {}s)", keyword, ttl_seconds);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", keyword, e);
                Ok(())
            }
        }
    }

    async fn invalidate(&self, keyword: &str) -> CacheResult<()> {
        let key = self.build_key(keyword);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Cache INVALIDATE: {}", keyword);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", keyword, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
