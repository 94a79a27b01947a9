//! Business logic services for the application layer.

pub mod keyword_resolver;
pub mod link_service;

pub use keyword_resolver::{KeywordPath, KeywordResolver, MatchStage, Resolution};
pub use link_service::LinkService;
