//! Error types for link scraping
//!
//! Every failure carries enough context (source, URL, selector, path) to be
//! diagnosed from a single log line.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for scraping operations
pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Error types for scraping operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A next-page control exists but the result selector matched nothing.
    ///
    /// The selector no longer matches the live page structure, so every
    /// following page would fail the same way.
    #[error("Result selector matched nothing on a page with a next-page link: {url} -- {selector}")]
    BrokenSelector { url: String, selector: String },

    /// Network, render or CDP level failure while reaching a page
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Unknown source id, malformed search operator or invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Writing the final link list failed
    #[error("Failed to write results to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Browser launch or browsing context setup failed
    #[error("Browser error: {0}")]
    Browser(String),
}

impl ScrapeError {
    pub(crate) fn navigation(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Navigation {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Whether this error belongs to a single crawl and can be isolated.
    ///
    /// Browser errors and output errors concern the whole run.
    #[must_use]
    pub fn is_per_crawl(&self) -> bool {
        matches!(
            self,
            Self::BrokenSelector { .. } | Self::Navigation { .. } | Self::Configuration(_)
        )
    }
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the whole context chain
        Self::Browser(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_selector_message_names_url_and_selector() {
        let err = ScrapeError::BrokenSelector {
            url: "https://www.bing.com/search?q=x".to_string(),
            selector: "#b_results > li > h2 > a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://www.bing.com/search?q=x"));
        assert!(msg.contains("#b_results > li > h2 > a"));
        assert!(err.is_per_crawl());
    }

    #[test]
    fn anyhow_errors_become_browser_errors_with_context() {
        let err: ScrapeError = anyhow::anyhow!("root cause")
            .context("Failed to launch browser")
            .into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to launch browser"));
        assert!(msg.contains("root cause"));
        assert!(!err.is_per_crawl());
    }
}
