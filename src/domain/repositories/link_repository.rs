//! Repository trait for link data access.

use crate::domain::entities::{Link, LinkPatch, LinkQuery, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for stored go-links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - `DashMap`-backed store
/// - [`crate::infrastructure::cache::CachedLinkRepository`] - read-through cache decorator
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the keyword already exists.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Exact point lookup by keyword.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Link))` if found
    /// - `Ok(None)` if no link has exactly this keyword
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the lookup itself failed. Callers
    /// must not treat this as "not found".
    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Lists links matching `query`.
    async fn list(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError>;

    /// Partially updates a link, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError>;

    /// Deletes a link, returning the removed record if it existed.
    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Atomically adds one to the view counter of a link.
    ///
    /// Incrementing a link that no longer exists is not an error.
    async fn increment_views(&self, id: i64) -> Result<(), AppError>;

    /// Counts all stored links. Also used as a liveness check.
    async fn count(&self) -> Result<i64, AppError>;
}
