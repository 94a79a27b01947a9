//! Link management service.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{Link, LinkPatch, LinkQuery, NewLink, PLACEHOLDER};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Service for creating, listing, updating and deleting go-links.
///
/// Input syntax is validated by the API layer before it reaches this service.
pub struct LinkService {
    link_repository: Arc<dyn LinkRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Creates a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the keyword is already taken.
    pub async fn create_link(&self, new_link: NewLink) -> Result<Link, AppError> {
        if self
            .link_repository
            .find_by_keyword(&new_link.keyword)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Keyword already exists",
                json!({ "keyword": new_link.keyword }),
            ));
        }

        let link = self.link_repository.create(new_link).await?;
        info!(id = link.id, keyword = %link.keyword, "Link created");
        Ok(link)
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Retrieves a link by its exact keyword.
    pub async fn get_link_by_keyword(&self, keyword: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_keyword(keyword)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "keyword": keyword })))
    }

    /// Lists links with optional filtering and ordering.
    pub async fn list_links(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError> {
        self.link_repository.list(query).await
    }

    /// Free-text search used by the miss fallback page.
    pub async fn search(&self, term: &str) -> Result<Vec<Link>, AppError> {
        let term = term.trim();
        let query = LinkQuery {
            search: (!term.is_empty()).then(|| term.to_string()),
            ..LinkQuery::default()
        };
        self.link_repository.list(&query).await
    }

    /// Partially updates a link.
    ///
    /// A destination containing `{*}` always leaves the link parameterized,
    /// whatever flag the patch carries.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn update_link(&self, id: i64, mut patch: LinkPatch) -> Result<Link, AppError> {
        let existing = self.get_link(id).await?;

        let destination = patch
            .destination
            .as_deref()
            .unwrap_or(&existing.destination);
        if destination.contains(PLACEHOLDER) {
            patch.is_parameterized = Some(true);
        }

        let link = self.link_repository.update(id, patch).await?;
        info!(id = link.id, keyword = %link.keyword, "Link updated");
        Ok(link)
    }

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn delete_link(&self, id: i64) -> Result<Link, AppError> {
        let link = self
            .link_repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;

        info!(id = link.id, keyword = %link.keyword, "Link deleted");
        Ok(link)
    }

    /// Total number of stored links.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;

    fn create_test_link(id: i64, keyword: &str, destination: &str) -> Link {
        let now = Utc::now();
        Link {
            id,
            keyword: keyword.to_string(),
            destination: destination.to_string(),
            description: String::new(),
            is_parameterized: destination.contains(PLACEHOLDER),
            tags: Vec::new(),
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_link_success() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_keyword()
            .withf(|k| k == "gh")
            .times(1)
            .returning(|_| Ok(None));

        let created = create_test_link(1, "gh", "https://github.com/{*}");
        mock_repo
            .expect_create()
            .withf(|new_link| new_link.keyword == "gh" && new_link.is_parameterized)
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .create_link(NewLink::new(
                "GH",
                "https://github.com/{*}".to_string(),
                String::new(),
                false,
            ))
            .await
            .unwrap();

        assert_eq!(link.id, 1);
        assert_eq!(link.keyword, "gh");
    }

    #[tokio::test]
    async fn test_create_link_duplicate_keyword() {
        let mut mock_repo = MockLinkRepository::new();

        let existing = create_test_link(5, "gh", "https://github.com");
        mock_repo
            .expect_find_by_keyword()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_create().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service
            .create_link(NewLink::new(
                "gh",
                "https://other.com".to_string(),
                String::new(),
                false,
            ))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.get_link(99).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_link_forces_parameterized_for_template() {
        let mut mock_repo = MockLinkRepository::new();

        let existing = create_test_link(3, "jira", "https://jira.test");
        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        let updated = create_test_link(3, "jira", "https://jira.test/browse/{*}");
        mock_repo
            .expect_update()
            .withf(|id, patch| *id == 3 && patch.is_parameterized == Some(true))
            .times(1)
            .returning(move |_, _| Ok(updated.clone()));

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .update_link(
                3,
                LinkPatch {
                    destination: Some("https://jira.test/browse/{*}".to_string()),
                    is_parameterized: Some(false),
                    ..LinkPatch::default()
                },
            )
            .await
            .unwrap();

        assert!(link.is_parameterized);
    }

    #[tokio::test]
    async fn test_update_link_keeps_explicit_flag_for_plain_destination() {
        let mut mock_repo = MockLinkRepository::new();

        let existing = create_test_link(4, "wiki", "https://wiki.test");
        mock_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));

        let updated = create_test_link(4, "wiki", "https://wiki.test");
        mock_repo
            .expect_update()
            .withf(|_, patch| patch.is_parameterized == Some(true) && patch.destination.is_none())
            .times(1)
            .returning(move |_, _| Ok(updated.clone()));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service
            .update_link(
                4,
                LinkPatch {
                    is_parameterized: Some(true),
                    ..LinkPatch::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_link_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_delete().times(1).returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo));

        let result = service.delete_link(42).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_blank_term_lists_everything() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_list()
            .withf(|query| query.search.is_none())
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = LinkService::new(Arc::new(mock_repo));

        assert!(service.search("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_trims_term() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_list()
            .withf(|query| query.search.as_deref() == Some("kib"))
            .times(1)
            .returning(|_| Ok(vec![create_test_link(1, "kibana", "https://kibana.test")]));

        let service = LinkService::new(Arc::new(mock_repo));

        let links = service.search(" kib ").await.unwrap();
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_through_cache_evicts_keyword() {
        use crate::infrastructure::cache::{CachedLinkRepository, MockCacheService};
        use crate::infrastructure::persistence::InMemoryLinkRepository;

        let store = Arc::new(InMemoryLinkRepository::new());
        let link = store
            .create(NewLink::new(
                "gh",
                "https://github.com/{*}".to_string(),
                String::new(),
                false,
            ))
            .await
            .unwrap();

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|keyword| keyword == "gh")
            .times(1)
            .returning(|_| Ok(()));

        let service = LinkService::new(Arc::new(CachedLinkRepository::new(
            store.clone(),
            Arc::new(cache),
        )));

        let removed = service.delete_link(link.id).await.unwrap();
        assert_eq!(removed.keyword, "gh");
        assert!(store.find_by_keyword("gh").await.unwrap().is_none());
    }
}
