#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use std::sync::Arc;
use tokio::sync::mpsc;

use golinks::api::routes::management_routes;
use golinks::domain::entities::{Link, NewLink};
use golinks::domain::repositories::LinkRepository;
use golinks::domain::view_event::{ViewEvent, ViewQueue};
use golinks::infrastructure::cache::NullCache;
use golinks::infrastructure::persistence::InMemoryLinkRepository;
use golinks::routes::keyword_routes;
use golinks::state::AppState;

/// A server over an in-memory store, plus handles to inspect side effects.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryLinkRepository>,
    pub views: mpsc::Receiver<ViewEvent>,
    pub state: AppState,
}

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>, mpsc::Receiver<ViewEvent>) {
    let store = Arc::new(InMemoryLinkRepository::new());
    let (view_queue, rx) = ViewQueue::bounded(100);

    let state = AppState::new(store.clone(), Arc::new(NullCache), view_queue);

    (state, store, rx)
}

/// Keyword and management routes without rate limiting, which needs a peer address.
pub fn test_router(state: AppState) -> Router {
    keyword_routes()
        .nest("/api", management_routes())
        .with_state(state)
}

pub fn spawn_app() -> TestApp {
    let (state, store, views) = create_test_state();
    let server = TestServer::new(test_router(state.clone())).unwrap();

    TestApp {
        server,
        store,
        views,
        state,
    }
}

pub async fn create_link(store: &InMemoryLinkRepository, keyword: &str, destination: &str) -> Link {
    store
        .create(NewLink::new(
            keyword,
            destination.to_string(),
            String::new(),
            false,
        ))
        .await
        .unwrap()
}

/// Stores a link flagged parameterized even if `destination` has no `{*}`.
pub async fn create_parameterized_link(
    store: &InMemoryLinkRepository,
    keyword: &str,
    destination: &str,
) -> Link {
    store
        .create(NewLink::new(
            keyword,
            destination.to_string(),
            String::new(),
            true,
        ))
        .await
        .unwrap()
}

/// Drains every view event scheduled so far.
pub fn drain_views(rx: &mut mpsc::Receiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
