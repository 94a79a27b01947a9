//! In-memory implementation of the link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use crate::domain::entities::{
    Link, LinkPatch, LinkQuery, NewLink, SortField, SortOrder, normalize_tags,
};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// `DashMap`-backed link store keyed by keyword.
///
/// Sharded locks let point lookups run concurrently with writes to other
/// keywords. Lookups by id scan the map.
#[derive(Debug)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, Link>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            links: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn keyword_of(&self, id: i64) -> Option<String> {
        self.links
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.key().clone())
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_search(link: &Link, term: &str) -> bool {
    let term = term.to_lowercase();
    [&link.keyword, &link.destination, &link.description]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

fn compare(a: &Link, b: &Link, sort: SortField) -> Ordering {
    let primary = match sort {
        SortField::Keyword => a.keyword.cmp(&b.keyword),
        SortField::Views => a.views.cmp(&b.views),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    primary.then(a.id.cmp(&b.id))
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.keyword.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_keyword_key" }),
            )),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let link = Link {
                    id: self.next_id.fetch_add(1, AtomicOrdering::SeqCst),
                    keyword: new_link.keyword,
                    destination: new_link.destination,
                    description: new_link.description,
                    is_parameterized: new_link.is_parameterized,
                    tags: new_link.tags,
                    views: 0,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(keyword).map(|entry| entry.value().clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError> {
        let mut links: Vec<Link> = self
            .links
            .iter()
            .filter(|entry| {
                query
                    .search
                    .as_deref()
                    .is_none_or(|term| matches_search(entry.value(), term))
            })
            .filter(|entry| {
                query
                    .tag
                    .as_deref()
                    .is_none_or(|tag| entry.tags.iter().any(|t| t == tag))
            })
            .map(|entry| entry.value().clone())
            .collect();

        links.sort_by(|a, b| {
            let ordering = compare(a, b, query.sort);
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(links)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let not_found = || AppError::not_found("Link not found", json!({ "id": id }));

        let keyword = self.keyword_of(id).ok_or_else(not_found)?;
        let mut entry = self.links.get_mut(&keyword).ok_or_else(not_found)?;

        if let Some(destination) = patch.destination {
            entry.destination = destination;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        if let Some(is_parameterized) = patch.is_parameterized {
            entry.is_parameterized = is_parameterized;
        }
        if let Some(tags) = patch.tags {
            entry.tags = normalize_tags(tags);
        }
        entry.updated_at = Utc::now();

        Ok(entry.value().clone())
    }

    async fn delete(&self, id: i64) -> Result<Option<Link>, AppError> {
        let Some(keyword) = self.keyword_of(id) else {
            return Ok(None);
        };
        Ok(self.links.remove(&keyword).map(|(_, link)| link))
    }

    async fn increment_views(&self, id: i64) -> Result<(), AppError> {
        if let Some(mut entry) = self.links.iter_mut().find(|entry| entry.id == id) {
            entry.views += 1;
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }
}
