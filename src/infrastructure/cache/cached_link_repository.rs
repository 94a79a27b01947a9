//! Read-through cache decorator for any link repository.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::service::CacheService;
use crate::domain::entities::{Link, LinkPatch, LinkQuery, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Serves keyword lookups from a [`CacheService`], falling back to the inner repository.
///
/// Only hits are cached; a miss always reaches the store so newly created
/// links are visible immediately. Updates and deletes invalidate the affected
/// keyword. Cached records may carry a stale `views` value.
///
/// Cache population runs in the background, so it can land after a
/// concurrent write has already invalidated the keyword. Every write bumps
/// `writes`; a population that started under an older value evicts what it
/// just stored. This covers writers in the same process only.
pub struct CachedLinkRepository {
    inner: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    writes: Arc<AtomicU64>,
}

impl CachedLinkRepository {
    pub fn new(inner: Arc<dyn LinkRepository>, cache: Arc<dyn CacheService>) -> Self {
        Self {
            inner,
            cache,
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    async fn after_write(&self, keyword: &str) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.invalidate(keyword).await;
    }

    async fn invalidate(&self, keyword: &str) {
        if let Err(e) = self.cache.invalidate(keyword).await {
            warn!(error = %e, keyword, "Failed to invalidate cache");
        }
    }
}

#[async_trait]
impl LinkRepository for CachedLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.inner.create(new_link).await
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Link>, AppError> {
        match self.cache.get_link(keyword).await {
            Ok(Some(link)) => return Ok(Some(link)),
            Ok(None) => debug!(keyword, "Cache MISS"),
            Err(e) => error!(error = %e, keyword, "Cache error, falling back to store"),
        }

        // Read before the store so any write racing this lookup is seen.
        let generation = self.writes.load(Ordering::SeqCst);
        let link = self.inner.find_by_keyword(keyword).await?;

        if let Some(found) = &link {
            let cache = self.cache.clone();
            let writes = self.writes.clone();
            let keyword = keyword.to_string();
            let found = found.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_link(&keyword, &found, None).await {
                    error!(error = %e, keyword, "Failed to cache link");
                    return;
                }
                if writes.load(Ordering::SeqCst) != generation {
                    debug!(keyword, "Write raced cache population, evicting");
                    if let Err(e) = cache.invalidate(&keyword).await {
                        warn!(error = %e, keyword, "Failed to evict raced cache entry");
                    }
                }
            });
        }

        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn list(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError> {
        self.inner.list(query).await
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let link = self.inner.update(id, patch).await?;
        self.after_write(&link.keyword).await;
        Ok(link)
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let link = self.inner.delete(id).await?;
        if let Some(removed) = &link {
            self.after_write(&removed.keyword).await;
        }
        Ok(link)
    }

    async fn increment_views(&self, id: i64) -> Result<(), AppError> {
        self.inner.increment_views(id).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        self.inner.count().await
    }
}
