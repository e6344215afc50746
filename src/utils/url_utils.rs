//! URL helpers used when post-processing extracted links.

use url::Url;

/// Reduce an absolute URL to its path plus query string.
///
/// The `?` is only kept when the query is non-empty, so
/// `https://example.com/a?` and `https://example.com/a` both become `/a`.
/// Returns `None` when `link` is not an absolute URL.
#[must_use]
pub fn path_and_query(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    match url.query() {
        Some(query) if !query.is_empty() => Some(format!("{}?{query}", url.path())),
        _ => Some(url.path().to_string()),
    }
}
