//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Link management routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `GET    /links`        - List links (`q`, `sort`, `order`)
/// - `POST   /links`        - Create a link
/// - `GET    /links/{id}`   - Fetch a link
/// - `PATCH  /links/{id}`   - Partially update a link
/// - `DELETE /links/{id}`   - Delete a link
pub fn management_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{id}",
            get(get_link_handler)
                .patch(update_link_handler)
                .delete(delete_link_handler),
        )
}
