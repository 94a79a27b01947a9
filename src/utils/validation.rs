//! Keyword and destination syntax rules for link input.
//!
//! These run before a record is stored; the resolver assumes stored links
//! already satisfy them.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;
use validator::ValidationError;

use crate::domain::entities::PLACEHOLDER;

/// Keywords that would shadow service routes.
pub const RESERVED_KEYWORDS: &[&str] = &["api", "static", "directory", "healthz", "favicon.ico"];

/// Compiled regex for keyword syntax: one or two `/`-separated segments of
/// letters, digits, `-`, `_` and `.`, each starting with a non-dot. A second
/// segment of `{*}` marks a legacy wildcard keyword.
///
/// Keywords are capped at two segments because the router only ever looks up
/// `keyword` or `keyword/subkey`.
pub static KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_\-][a-zA-Z0-9._\-]*(/([a-zA-Z0-9_\-][a-zA-Z0-9._\-]*|\{\*\}))?$")
        .unwrap()
});

/// Compiled regex for a single tag.
pub static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_\-]{1,50}$").unwrap());

/// Most tags a single link may carry.
pub const MAX_TAGS: usize = 20;

/// Compiled regex for listing sort/order parameters.
pub static ALPHA_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z_]+$").unwrap());

/// Rejects reserved keywords (case-insensitive).
pub fn not_reserved(keyword: &str) -> Result<(), ValidationError> {
    let lowered = keyword.to_lowercase();
    if RESERVED_KEYWORDS.contains(&lowered.as_str()) {
        let mut err = ValidationError::new("reserved_keyword");
        err.message = Some(format!("'{}' is a reserved keyword", keyword).into());
        return Err(err);
    }
    Ok(())
}

/// Validates a tag list: at most [`MAX_TAGS`] entries, each matching
/// [`TAG_REGEX`] once surrounding whitespace is trimmed.
pub fn valid_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        let mut err = ValidationError::new("too_many_tags");
        err.message = Some(format!("at most {} tags are allowed", MAX_TAGS).into());
        return Err(err);
    }

    if let Some(bad) = tags.iter().find(|tag| !TAG_REGEX.is_match(tag.trim())) {
        let mut err = ValidationError::new("invalid_tag");
        err.message = Some(
            format!("'{}' may only contain letters, digits, '-' and '_'", bad).into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a destination template.
///
/// `{*}` tokens are swapped for a plain word before parsing, then the result
/// must be an absolute `http` or `https` URL.
pub fn valid_destination(destination: &str) -> Result<(), ValidationError> {
    let candidate = destination.replace(PLACEHOLDER, "placeholder");

    let url = Url::parse(&candidate).map_err(|e| {
        let mut err = ValidationError::new("invalid_url");
        err.message = Some(format!("Invalid URL: {}", e).into());
        err
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        let mut err = ValidationError::new("invalid_scheme");
        err.message = Some("requires scheme http or https".into());
        return Err(err);
    }

    if url.host_str().is_none() {
        let mut err = ValidationError::new("missing_host");
        err.message = Some("URL must include a host".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_regex() {
        assert!(KEYWORD_REGEX.is_match("google"));
        assert!(KEYWORD_REGEX.is_match("kibana/prod"));
        assert!(KEYWORD_REGEX.is_match("my-link"));
        assert!(KEYWORD_REGEX.is_match("docs/{*}"));
        assert!(KEYWORD_REGEX.is_match("go.dev"));
        assert!(KEYWORD_REGEX.is_match("my_link"));
        assert!(!KEYWORD_REGEX.is_match("docs/{*}/more"));
        assert!(!KEYWORD_REGEX.is_match("foo/"));
        assert!(!KEYWORD_REGEX.is_match("a/b/c"));
        assert!(!KEYWORD_REGEX.is_match(".hidden"));
        assert!(!KEYWORD_REGEX.is_match("/google"));
        assert!(!KEYWORD_REGEX.is_match("has space"));
        assert!(!KEYWORD_REGEX.is_match(""));
    }

    #[test]
    fn test_not_reserved() {
        assert!(not_reserved("google").is_ok());
        assert!(not_reserved("api").is_err());
        assert!(not_reserved("HEALTHZ").is_err());
        assert!(not_reserved("favicon.ico").is_err());
        assert!(not_reserved("api-docs").is_ok());
    }

    #[test]
    fn test_valid_tags() {
        assert!(valid_tags(&[]).is_ok());
        assert!(valid_tags(&["code".to_string(), " on_call ".to_string()]).is_ok());
        assert!(valid_tags(&["has space".to_string()]).is_err());
        assert!(valid_tags(&[String::new()]).is_err());

        let many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{}", i)).collect();
        assert!(valid_tags(&many).is_err());
    }

    #[test]
    fn test_valid_destination() {
        assert!(valid_destination("https://google.com").is_ok());
        assert!(valid_destination("http://intranet.local/path?q=1").is_ok());
        assert!(valid_destination("https://jira.com/browse/{*}").is_ok());
        assert!(valid_destination("https://github.com/org/{*}/issues/{*}").is_ok());
    }

    #[test]
    fn test_invalid_destination() {
        assert!(valid_destination("google.com").is_err());
        assert!(valid_destination("ftp://files.example.com").is_err());
        assert!(valid_destination("").is_err());
    }
}
