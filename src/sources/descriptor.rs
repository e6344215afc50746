//! Source descriptors and search operators
//!
//! A [`SourceDescriptor`] is plain `'static` data: selectors, a page-size
//! hint, a URL builder function and an optional pre-navigation step. Crawls
//! borrow descriptors read-only, so one descriptor can back any number of
//! concurrent crawls.

use std::fmt;
use url::Url;

use crate::error::{ScrapeError, ScrapeResult};

/// Builds the first results page URL from a page-size hint and a rendered query
pub type UrlBuilder = fn(page_size: u32, query: &str) -> Result<Url, url::ParseError>;

/// One-time setup performed in a fresh browsing context before the first
/// results page is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreNavigation {
    /// Open `url`, click the element matching `selector` and wait for the
    /// navigation the click triggers (consent walls, cookie banners).
    ClickThrough {
        url: &'static str,
        selector: &'static str,
    },
}

/// Immutable per-search-engine configuration
#[derive(Debug, Clone, Copy)]
pub struct SourceDescriptor {
    /// Registry key, e.g. `"bing"`
    pub id: &'static str,
    /// Anchors whose resolved `href` is a result link
    pub result_selector: &'static str,
    /// The "next page" anchor, `None` when the engine has no pagination control
    pub next_page_selector: Option<&'static str>,
    /// Advisory results-per-page hint; engines may ignore or cap it
    pub page_size: u32,
    pub build_url: UrlBuilder,
    pub pre_navigation: Option<PreNavigation>,
}

impl SourceDescriptor {
    /// Build the first results page URL for `operators`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Configuration`] if an operator is malformed or
    /// the builder cannot produce a valid URL.
    pub fn start_url(&self, operators: &SearchOperators) -> ScrapeResult<Url> {
        operators.validate()?;
        (self.build_url)(self.page_size, &operators.to_query()).map_err(|e| {
            ScrapeError::Configuration(format!(
                "source '{}' produced an invalid URL for query '{operators}': {e}",
                self.id
            ))
        })
    }

    /// Selector passed to the page for the next-page control (empty if none)
    #[must_use]
    pub fn next_selector(&self) -> &'static str {
        self.next_page_selector.unwrap_or("")
    }
}

/// Ordered list of search-engine operators such as `site:` and `filetype:`.
///
/// Insertion order is kept, so `site` then `filetype` renders as
/// `site:example.com filetype:pdf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOperators {
    pairs: Vec<(String, String)>,
}

impl SearchOperators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Operators restricting results to `domain`
    #[must_use]
    pub fn site(domain: impl Into<String>) -> Self {
        Self::new().with("site", domain)
    }

    /// Append an operator, replacing the value of an existing key in place
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Render as `<operator>:<value>` pairs joined by single spaces.
    ///
    /// The result is not URL-encoded; URL builders encode it as a query
    /// component.
    #[must_use]
    pub fn to_query(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Reject operators that would change the meaning of the query.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Configuration`] for an empty operator list, a
    /// key that is not ASCII alphanumeric, or an empty value or one containing
    /// whitespace.
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.pairs.is_empty() {
            return Err(ScrapeError::Configuration(
                "at least one search operator is required".to_string(),
            ));
        }
        for (key, value) in &self.pairs {
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ScrapeError::Configuration(format!(
                    "invalid search operator name '{key}'"
                )));
            }
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ScrapeError::Configuration(format!(
                    "invalid value '{value}' for search operator '{key}'"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for SearchOperators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}
