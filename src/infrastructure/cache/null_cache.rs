use super::service::{CacheResult, CacheService};
use crate::domain::entities::Link;
use async_trait::async_trait;

/// Cache that stores nothing, so every keyword goes to the store.
///
/// Stands in for [`super::RedisCache`] when `REDIS_URL` is unset or Redis is
/// unreachable at startup. It always reports healthy: a disabled cache does
/// not degrade `/healthz`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

#[async_trait]
impl CacheService for NullCache {
    async fn get_link(&self, _: &str) -> CacheResult<Option<Link>> {
        Ok(None)
    }

    async fn set_link(&self, _: &str, _: &Link, _: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
