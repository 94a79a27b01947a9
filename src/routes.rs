//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /?q=<term>`                        - Search (miss landing page)
//! - `GET  /healthz`                          - Health check: DB, cache, view queue
//! - `GET  /{keyword}`                        - Keyword redirect
//! - `GET  /{keyword}/{subkey}`               - Keyword redirect
//! - `GET  /{keyword}/{subkey}/{*wildcard}`   - Keyword redirect
//! - `/api/*`                                 - Link management (rate limited)
//!
//! Static routes win over the keyword captures, which is why reserved
//! keywords cannot be stored.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, search_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Search, health and keyword redirect routes.
pub fn keyword_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_handler))
        .route("/healthz", get(health_handler))
        .route("/{keyword}", get(redirect_handler))
        .route("/{keyword}/{subkey}", get(redirect_handler))
        .route("/{keyword}/{subkey}/{*wildcard}", get(redirect_handler))
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads the client IP from
///   forwarding headers instead of the peer socket address; enable only when
///   the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let management = api::routes::management_routes();
    let api_router = if behind_proxy {
        management.layer(rate_limit::proxied_layer())
    } else {
        management.layer(rate_limit::layer())
    };

    let router = keyword_routes()
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
