//! Link entity representing a keyword → destination mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Literal substitution marker inside a destination template.
pub const PLACEHOLDER: &str = "{*}";

/// A stored go-link.
///
/// `keyword` may itself contain `/` (e.g. `kibana/prod`). When
/// `is_parameterized` is set, trailing request segments are substituted into
/// the `{*}` tokens of `destination` at resolution time. The flag can be set
/// without any token present, in which case substitution is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Link {
    pub id: i64,
    pub keyword: String,
    pub destination: String,
    pub description: String,
    pub is_parameterized: bool,
    /// Sorted, lowercase, unique.
    pub tags: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Number of `{*}` tokens in the destination template.
    pub fn placeholder_count(&self) -> usize {
        self.destination.matches(PLACEHOLDER).count()
    }
}

/// Input data for creating a new link.
///
/// Produced from validated API input; `keyword` is already lowercased and
/// `is_parameterized` already reflects the destination template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub keyword: String,
    pub destination: String,
    pub description: String,
    pub is_parameterized: bool,
    pub tags: Vec<String>,
}

impl NewLink {
    /// Builds a new link, normalizing the keyword and deriving the
    /// parameterized flag.
    ///
    /// A destination containing `{*}` is always parameterized; otherwise the
    /// explicit flag is kept.
    pub fn new(
        keyword: &str,
        destination: String,
        description: String,
        is_parameterized: bool,
    ) -> Self {
        let is_parameterized = is_parameterized || destination.contains(PLACEHOLDER);
        Self {
            keyword: keyword.to_lowercase(),
            destination,
            description,
            is_parameterized,
            tags: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = normalize_tags(tags);
        self
    }
}

/// Trims and lowercases tags, drops blanks, then sorts and dedups.
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut tags: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    tags
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged; `Some` tags replace the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub destination: Option<String>,
    pub description: Option<String>,
    pub is_parameterized: Option<bool>,
    pub tags: Option<Vec<String>>,
}

/// Sortable columns for link listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Keyword,
    Views,
    CreatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Keyword => "keyword",
            SortField::Views => "views",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// Sort direction for link listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filter and ordering for link listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkQuery {
    /// Case-insensitive substring matched against keyword, destination and description.
    pub search: Option<String>,
    /// Only links carrying this tag.
    pub tag: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
}
