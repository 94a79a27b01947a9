//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::link::{
    CreateLinkRequest, LinkListResponse, LinkResponse, ListLinksParams, UpdateLinkRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// A destination containing `{*}` is stored as parameterized regardless of
/// the `is_parameterized` flag in the request.
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the keyword already exists.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state.link_service.create_link(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists links.
///
/// # Endpoint
///
/// `GET /api/links?q=<term>&tag=<tag>&sort=<keyword|views|created_at>&order=<asc|desc>`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Query(params): Query<ListLinksParams>,
) -> Result<Json<LinkListResponse>, AppError> {
    params.validate()?;

    let links = state.link_service.list_links(&params.into_query()?).await?;

    Ok(Json(links.into()))
}

/// `GET /api/links/{id}`
pub async fn get_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(id).await?;
    Ok(Json(link.into()))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{id}`
///
/// ```json
/// {
///   "destination": "https://jira.example.com/browse/{*}",
///   "description": "Issue tracker",
///   "is_parameterized": true,
///   "tags": ["tracker"]
/// }
/// ```
///
/// The keyword itself cannot be changed. `tags`, when present, replaces the
/// whole set.
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
/// Returns 400 Bad Request if validation fails.
pub async fn update_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let link = state.link_service.update_link(id, payload.into()).await?;

    Ok(Json(link.into()))
}

/// Deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link doesn't exist.
pub async fn delete_link_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
