//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{KeywordResolver, LinkService};
use crate::domain::repositories::LinkRepository;
use crate::domain::view_event::ViewQueue;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<KeywordResolver>,
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
    pub view_queue: ViewQueue,
}

impl AppState {
    /// Wires the services over a single link repository.
    ///
    /// `links` is usually a [`crate::infrastructure::cache::CachedLinkRepository`]
    /// wrapping the database, with `cache` being the same backend it reads through.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        view_queue: ViewQueue,
    ) -> Self {
        Self {
            resolver: Arc::new(KeywordResolver::new(links.clone(), view_queue.clone())),
            link_service: Arc::new(LinkService::new(links)),
            cache,
            view_queue,
        }
    }
}
