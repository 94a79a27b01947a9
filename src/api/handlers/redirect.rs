//! Handler for keyword redirects.

use axum::{
    extract::{RawPathParams, State},
    response::Redirect,
};

use crate::application::services::{KeywordPath, Resolution};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a keyword path and redirects to its destination.
///
/// # Endpoints
///
/// - `GET /{keyword}`
/// - `GET /{keyword}/{subkey}`
/// - `GET /{keyword}/{subkey}/{*wildcard}`
///
/// Captures are taken as sent, still percent-encoded, so `a%2Fb` stays one
/// argument and `hello%20world` is substituted without being decoded.
///
/// # Responses
///
/// - **307**: `Location` is the resolved destination.
/// - **307**: on a miss, `Location` is `/?q=<keyword>` so the caller lands on search.
///
/// The view counter is bumped in the background; the redirect never waits for it.
///
/// # Errors
///
/// Returns 500 if the link store fails during lookup.
pub async fn redirect_handler(
    State(state): State<AppState>,
    params: RawPathParams,
) -> Result<Redirect, AppError> {
    let path = keyword_path(&params);

    match state.resolver.resolve(&path).await? {
        Resolution::Redirect { destination, .. } => {
            Ok(Redirect::temporary(&location(&destination)))
        }
        Resolution::Miss => Ok(Redirect::temporary(&search_location(&path.keyword))),
    }
}

fn keyword_path(params: &RawPathParams) -> KeywordPath {
    let mut path = KeywordPath::default();
    for (name, value) in params.iter() {
        match name {
            "keyword" => path.keyword = value.to_string(),
            "subkey" => path.subkey = value.to_string(),
            "wildcard" => path.wildcard_path = value.to_string(),
            _ => {}
        }
    }
    path
}

/// Percent-encodes every character that cannot appear in a `Location` header
/// as is: controls, space and non-ASCII.
fn location(destination: &str) -> String {
    let mut out = String::with_capacity(destination.len());
    let mut buf = [0u8; 4];
    for ch in destination.chars() {
        if ch.is_ascii_graphic() {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    out
}

/// Search page location for a keyword that resolved to nothing.
fn search_location(raw_keyword: &str) -> String {
    let term = urlencoding::decode(raw_keyword)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw_keyword.to_string());
    format!("/?q={}", urlencoding::encode(&term))
}
