//! Handler for the search landing page.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::link::LinkResponse;
use crate::api::dto::search::{SearchParams, SearchResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists links matching `q`, or every link when `q` is absent or blank.
///
/// # Endpoint
///
/// `GET /?q=<term>`
///
/// Missed keywords are redirected here, so the term is matched against
/// keyword, destination and description.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let term = params.q.unwrap_or_default();
    let links = state.link_service.search(&term).await?;

    let query = Some(term.trim().to_string()).filter(|t| !t.is_empty());

    Ok(Json(SearchResponse {
        query,
        results: links.into_iter().map(LinkResponse::from).collect(),
    }))
}
