//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::keyword_resolver::KeywordResolver`] - Keyword path resolution
//! - [`services::link_service::LinkService`] - Link management

pub mod services;
