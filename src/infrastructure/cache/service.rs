//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::Link;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache serialization error: {0}")]
    SerializationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching keyword → link lookups.
///
/// Implementations must be thread-safe. Cache failures degrade to store
/// lookups and never fail a request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the link stored under an exact keyword.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_link(&self, keyword: &str) -> CacheResult<Option<Link>>;

    /// Stores a link under its keyword with optional TTL in seconds.
    async fn set_link(&self, keyword: &str, link: &Link, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Removes a cached keyword. Used when a link is modified or deleted.
    async fn invalidate(&self, keyword: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}
