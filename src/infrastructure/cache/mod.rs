//! Caching layer for fast keyword lookups.
//!
//! Provides a [`CacheService`] trait with two implementations and a
//! repository decorator that uses it:
//! - [`RedisCache`] - Production Redis-backed cache
//! - [`NullCache`] - stores nothing; used when Redis is off or unreachable
//! - [`CachedLinkRepository`] - read-through wrapper around any link repository

mod cached_link_repository;
mod null_cache;
mod redis_cache;
mod service;

use std::sync::Arc;

use crate::config::CacheConfig;

pub use cached_link_repository::CachedLinkRepository;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;

/// Builds the cache described by `config`.
///
/// Without `REDIS_URL`, or when Redis cannot be reached, lookups go straight
/// to the store through [`NullCache`].
pub async fn connect(config: &CacheConfig) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Keyword cache disabled");
        return Arc::new(NullCache);
    };

    match RedisCache::connect(redis_url, config.ttl.as_secs()).await {
        Ok(redis) => Arc::new(redis),
        Err(e) => {
            tracing::warn!(error = %e, "Redis unavailable, keyword cache disabled");
            Arc::new(NullCache)
        }
    }
}
