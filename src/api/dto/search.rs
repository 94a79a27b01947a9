//! DTOs for the keyword search endpoint.

use serde::{Deserialize, Serialize};

use super::link::LinkResponse;

/// Query parameters for `GET /?q=`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Search results; `query` echoes the term a missed keyword was redirected with.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub results: Vec<LinkResponse>,
}
