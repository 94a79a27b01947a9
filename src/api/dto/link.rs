//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::domain::entities::{Link, LinkPatch, LinkQuery, NewLink, SortField, SortOrder};
use crate::error::AppError;
use crate::utils::validation::{
    ALPHA_REGEX, KEYWORD_REGEX, TAG_REGEX, not_reserved, valid_destination, valid_tags,
};

/// Request body for `POST /api/links`.
///
/// ```json
/// {
///   "keyword": "gh",
///   "destination": "https://github.com/{*}",
///   "description": "GitHub shortcuts",
///   "is_parameterized": false,
///   "tags": ["code"]
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(
        length(min = 1, max = 100, message = "keyword must be 1-100 characters"),
        regex(
            path = *KEYWORD_REGEX,
            message = "keyword is one or two '/'-separated segments of letters, digits, '-', '_' and '.', or 'name/{*}'"
        ),
        custom(function = "not_reserved")
    )]
    pub keyword: String,

    #[validate(custom(function = "valid_destination"))]
    pub destination: String,

    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,

    #[serde(default)]
    pub is_parameterized: bool,

    #[serde(default)]
    #[validate(custom(function = "valid_tags"))]
    pub tags: Vec<String>,
}

impl From<CreateLinkRequest> for NewLink {
    fn from(req: CreateLinkRequest) -> Self {
        NewLink::new(
            &req.keyword,
            req.destination,
            req.description,
            req.is_parameterized,
        )
        .with_tags(req.tags)
    }
}

/// Request body for `PATCH /api/links/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(custom(function = "valid_destination"))]
    pub destination: Option<String>,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    pub is_parameterized: Option<bool>,

    /// Replaces the whole tag set; `[]` clears it.
    #[validate(custom(function = "valid_tags"))]
    pub tags: Option<Vec<String>>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            destination: req.destination,
            description: req.description,
            is_parameterized: req.is_parameterized,
            tags: req.tags,
        }
    }
}

/// Query parameters for `GET /api/links`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListLinksParams {
    #[validate(length(max = 200))]
    pub q: Option<String>,

    #[validate(regex(path = *TAG_REGEX, message = "tag may only contain letters, digits, '-' and '_'"))]
    pub tag: Option<String>,

    #[validate(regex(path = *ALPHA_REGEX, message = "sort must be alphabetic"))]
    pub sort: Option<String>,

    #[validate(regex(path = *ALPHA_REGEX, message = "order must be alphabetic"))]
    pub order: Option<String>,
}

impl ListLinksParams {
    /// Converts raw parameters into a repository query.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an unknown sort field or order.
    pub fn into_query(self) -> Result<LinkQuery, AppError> {
        let sort = match self.sort.as_deref().map(str::to_lowercase).as_deref() {
            None => SortField::default(),
            Some("keyword") => SortField::Keyword,
            Some("views") => SortField::Views,
            Some("created_at") => SortField::CreatedAt,
            Some(other) => {
                return Err(AppError::bad_request(
                    "Unknown sort field",
                    json!({ "sort": other, "allowed": ["keyword", "views", "created_at"] }),
                ));
            }
        };

        let order = match self.order.as_deref().map(str::to_lowercase).as_deref() {
            None => SortOrder::default(),
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(other) => {
                return Err(AppError::bad_request(
                    "Unknown sort order",
                    json!({ "order": other, "allowed": ["asc", "desc"] }),
                ));
            }
        };

        let search = self
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(LinkQuery {
            search,
            tag: self.tag.map(|tag| tag.to_lowercase()),
            sort,
            order,
        })
    }
}

/// JSON representation of a stored link.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub id: i64,
    pub keyword: String,
    pub destination: String,
    pub description: String,
    pub is_parameterized: bool,
    pub placeholders: usize,
    pub tags: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            placeholders: link.placeholder_count(),
            id: link.id,
            keyword: link.keyword,
            destination: link.destination,
            description: link.description,
            is_parameterized: link.is_parameterized,
            tags: link.tags,
            views: link.views,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// Response body for `GET /api/links`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

impl From<Vec<Link>> for LinkListResponse {
    fn from(links: Vec<Link>) -> Self {
        let items: Vec<LinkResponse> = links.into_iter().map(LinkResponse::from).collect();
        Self {
            total: items.len(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(keyword: &str, destination: &str) -> CreateLinkRequest {
        CreateLinkRequest {
            keyword: keyword.to_string(),
            destination: destination.to_string(),
            description: String::new(),
            is_parameterized: false,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_valid_create_request() {
        assert!(create("gh", "https://github.com/{*}").validate().is_ok());
        assert!(create("kibana/prod", "https://kibana.example.com").validate().is_ok());
        assert!(create("docs/{*}", "https://docs.example.com/{*}").validate().is_ok());
        assert!(create("go.dev", "https://go.dev").validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_keyword() {
        assert!(create("", "https://example.com").validate().is_err());
        assert!(create("/lead", "https://example.com").validate().is_err());
        assert!(create("has space", "https://example.com").validate().is_err());
        assert!(create("a/b/c", "https://example.com").validate().is_err());
        assert!(create("API", "https://example.com").validate().is_err());
        assert!(create(&"a".repeat(101), "https://example.com").validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_destination() {
        assert!(create("gh", "github.com").validate().is_err());
        assert!(create("gh", "ftp://github.com").validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_tags() {
        let mut req = create("gh", "https://github.com");
        req.tags = vec!["on call".to_string()];
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_into_new_link() {
        let mut req = create("GH", "https://github.com/{*}");
        req.tags = vec!["Code".to_string(), "code".to_string()];
        let new_link: NewLink = req.into();
        assert_eq!(new_link.keyword, "gh");
        assert!(new_link.is_parameterized);
        assert_eq!(new_link.tags, vec!["code"]);
    }

    #[test]
    fn test_list_params_into_query() {
        let params = ListLinksParams {
            q: Some("  wiki ".to_string()),
            tag: Some("Code".to_string()),
            sort: Some("Views".to_string()),
            order: Some("desc".to_string()),
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.search.as_deref(), Some("wiki"));
        assert_eq!(query.tag.as_deref(), Some("code"));
        assert_eq!(query.sort, SortField::Views);
        assert_eq!(query.order, SortOrder::Desc);

        assert_eq!(
            ListLinksParams::default().into_query().unwrap(),
            LinkQuery::default()
        );
    }

    #[test]
    fn test_list_params_rejects_unknown_sort() {
        let params = ListLinksParams {
            sort: Some("destination".to_string()),
            ..ListLinksParams::default()
        };
        assert!(matches!(
            params.into_query(),
            Err(AppError::Validation { .. })
        ));
    }
}
