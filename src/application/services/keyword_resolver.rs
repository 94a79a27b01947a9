//! Keyword resolution: turns a decomposed request path into a redirect target.
//!
//! Resolution runs an ordered chain of stages; the first stage that matches
//! wins:
//!
//! | Stage | Lookup key | Argument source | Substitution |
//! |---|---|---|---|
//! | [`MatchStage::Exact`] | `keyword[/subkey]` | `wildcard_path` segments | one segment per `{*}` |
//! | [`MatchStage::BaseKeyword`] | `keyword` | `subkey` + `wildcard_path` segments | one segment per `{*}` |
//! | [`MatchStage::LegacyWildcard`] | `first_segment/{*}` | remaining segments, rejoined | first `{*}` only |
//!
//! Nothing matching yields [`Resolution::Miss`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{Link, PLACEHOLDER};
use crate::domain::repositories::LinkRepository;
use crate::domain::view_event::{ViewEvent, ViewQueue};
use crate::error::AppError;
use crate::utils::template::{fill_each, fill_first, split_segments};

/// A request path as decomposed by the router: `/{keyword}/{subkey}/{*wildcard_path}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordPath {
    pub keyword: String,
    pub subkey: String,
    pub wildcard_path: String,
}

impl KeywordPath {
    pub fn new(
        keyword: impl Into<String>,
        subkey: impl Into<String>,
        wildcard_path: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            subkey: subkey.into(),
            wildcard_path: wildcard_path.into(),
        }
    }

    /// `keyword` alone, or `keyword/subkey` when a subkey is present.
    pub fn full_keyword(&self) -> String {
        if self.subkey.is_empty() {
            self.keyword.clone()
        } else {
            format!("{}/{}", self.keyword, self.subkey)
        }
    }

    /// Every segment of the request path, in order.
    pub fn segments(&self) -> Vec<&str> {
        let mut segments = vec![self.keyword.as_str()];
        if !self.subkey.is_empty() {
            segments.push(&self.subkey);
        }
        segments.extend(split_segments(&self.wildcard_path));
        segments
    }
}

/// The stage that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Exact,
    BaseKeyword,
    LegacyWildcard,
}

impl MatchStage {
    /// Evaluation order.
    pub const ORDER: [MatchStage; 3] = [
        MatchStage::Exact,
        MatchStage::BaseKeyword,
        MatchStage::LegacyWildcard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStage::Exact => "exact",
            MatchStage::BaseKeyword => "base_keyword",
            MatchStage::LegacyWildcard => "legacy_wildcard",
        }
    }
}

/// Outcome of resolving a keyword path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect {
        destination: String,
        link_id: i64,
        stage: MatchStage,
    },
    Miss,
}

/// A stage hit: the matched record plus its computed destination.
#[derive(Debug)]
struct Matched {
    link: Link,
    destination: String,
}

/// Resolves keyword paths against a [`LinkRepository`].
///
/// Holds no mutable state. On every match a [`ViewEvent`] is scheduled on the
/// view queue before the result is returned; scheduling never waits.
pub struct KeywordResolver {
    links: Arc<dyn LinkRepository>,
    views: ViewQueue,
}

impl KeywordResolver {
    pub fn new(links: Arc<dyn LinkRepository>, views: ViewQueue) -> Self {
        Self { links, views }
    }

    /// Runs the stage chain for `path`.
    ///
    /// # Errors
    ///
    /// Any lookup failure other than "not found" aborts resolution with that
    /// error; later stages are not attempted.
    pub async fn resolve(&self, path: &KeywordPath) -> Result<Resolution, AppError> {
        for stage in MatchStage::ORDER {
            let Some(matched) = self.attempt(stage, path).await? else {
                continue;
            };

            debug!(
                keyword = %path.keyword,
                link = %matched.link.keyword,
                stage = stage.as_str(),
                destination = %matched.destination,
                "Keyword resolved"
            );
            metrics::counter!("golinks_resolutions_total", "stage" => stage.as_str())
                .increment(1);

            self.views
                .schedule(ViewEvent::new(matched.link.id, matched.link.keyword));

            return Ok(Resolution::Redirect {
                destination: matched.destination,
                link_id: matched.link.id,
                stage,
            });
        }

        info!(keyword = %path.keyword, path = %path.segments().join("/"), "Keyword not found");
        metrics::counter!("golinks_resolutions_total", "stage" => "miss").increment(1);

        Ok(Resolution::Miss)
    }

    async fn attempt(
        &self,
        stage: MatchStage,
        path: &KeywordPath,
    ) -> Result<Option<Matched>, AppError> {
        match stage {
            MatchStage::Exact => self.try_exact(path).await,
            MatchStage::BaseKeyword => self.try_base_keyword(path).await,
            MatchStage::LegacyWildcard => self.try_legacy_wildcard(path).await,
        }
    }

    /// The whole `keyword/subkey` is the lookup key; only the wildcard path
    /// supplies arguments.
    async fn try_exact(&self, path: &KeywordPath) -> Result<Option<Matched>, AppError> {
        let Some(link) = self.links.find_by_keyword(&path.full_keyword()).await? else {
            return Ok(None);
        };

        let destination = if link.is_parameterized {
            fill_each(&link.destination, split_segments(&path.wildcard_path))
        } else {
            link.destination.clone()
        };

        Ok(Some(Matched { link, destination }))
    }

    /// The first segment is the lookup key; subkey and wildcard segments are
    /// arguments.
    ///
    /// A plain (non-parameterized) link found here is deliberately ignored:
    /// `go/keyword/extra` never redirects to the plain destination of
    /// `keyword`, with or without `extra` appended.
    async fn try_base_keyword(&self, path: &KeywordPath) -> Result<Option<Matched>, AppError> {
        // Without a subkey the exact stage already looked up this same key.
        if path.subkey.is_empty() {
            return Ok(None);
        }

        let Some(link) = self.links.find_by_keyword(&path.keyword).await? else {
            return Ok(None);
        };

        if !link.is_parameterized {
            return Ok(None);
        }

        let args = std::iter::once(path.subkey.as_str())
            .chain(split_segments(&path.wildcard_path));
        let destination = fill_each(&link.destination, args);

        Ok(Some(Matched { link, destination }))
    }

    /// Looks up a link stored under the literal key `first/{*}` and puts all
    /// remaining segments, rejoined, into its first `{*}`.
    async fn try_legacy_wildcard(&self, path: &KeywordPath) -> Result<Option<Matched>, AppError> {
        let segments = path.segments();
        let [first, rest @ ..] = segments.as_slice() else {
            return Ok(None);
        };

        let legacy_key = format!("{}/{}", first, PLACEHOLDER);
        let Some(link) = self.links.find_by_keyword(&legacy_key).await? else {
            return Ok(None);
        };

        if rest.is_empty() {
            return Ok(None);
        }

        let destination = fill_first(&link.destination, &rest.join("/"));

        Ok(Some(Matched { link, destination }))
    }
}
