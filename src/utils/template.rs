//! Destination template substitution and request path splitting.

use crate::domain::entities::PLACEHOLDER;

/// Splits a slash-joined path into segments. An empty path has no segments.
///
/// Empty segments between consecutive slashes are kept.
pub fn split_segments(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('/').collect()
    }
}

/// Fills `{*}` tokens left to right, one argument per token.
///
/// Surplus tokens stay literal, surplus arguments are dropped. Inserted
/// arguments are never rescanned, so an argument containing `{*}` is copied
/// verbatim.
pub fn fill_each<'a>(template: &str, args: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    for arg in args {
        let Some(pos) = rest.find(PLACEHOLDER) else {
            break;
        };
        out.push_str(&rest[..pos]);
        out.push_str(arg);
        rest = &rest[pos + PLACEHOLDER.len()..];
    }

    out.push_str(rest);
    out
}

/// Replaces only the first `{*}` token with `replacement`.
pub fn fill_first(template: &str, replacement: &str) -> String {
    template.replacen(PLACEHOLDER, replacement, 1)
}
