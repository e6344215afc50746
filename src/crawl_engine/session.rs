//! Per-crawl pagination state
//!
//! A [`CrawlSession`] is owned by exactly one crawl. It holds the links found
//! so far and decides, page by page, whether the crawl goes on.

use std::collections::HashSet;
use url::Url;

use crate::error::{ScrapeError, ScrapeResult};
use crate::renderer::PageLinks;

/// What a rendered page means for the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page added `new_links` links and has a next page to follow
    Continue { new_links: usize },
    /// The page added `new_links` links and has no next page
    Exhausted { new_links: usize },
    /// The page added nothing; stop even if a next page exists
    Converged,
}

#[derive(Debug)]
pub struct CrawlSession {
    visited: HashSet<String>,
    current_url: Option<Url>,
    page_count: usize,
    page_limit: Option<usize>,
}

impl CrawlSession {
    #[must_use]
    pub fn new(start_url: Url, page_limit: Option<usize>) -> Self {
        Self {
            visited: HashSet::new(),
            current_url: Some(start_url),
            page_count: 0,
            page_limit,
        }
    }

    /// The next page to render, `None` once the crawl is done or the page
    /// limit is reached.
    #[must_use]
    pub fn next_target(&self) -> Option<&Url> {
        if self.page_limit == Some(self.page_count) {
            return None;
        }
        self.current_url.as_ref()
    }

    /// Fold one rendered page into the session.
    ///
    /// `url` and `result_selector` only serve error reporting.
    ///
    /// A page whose results were all seen before ends the crawl, even when a
    /// later page would have contributed new links.
    ///
    /// # Errors
    ///
    /// * [`ScrapeError::BrokenSelector`] - the page has a next link but no
    ///   results. Nothing from the page is recorded.
    /// * [`ScrapeError::Navigation`] - the next link is not a valid URL.
    pub fn record_page(
        &mut self,
        url: &Url,
        links: PageLinks,
        result_selector: &str,
    ) -> ScrapeResult<PageOutcome> {
        let PageLinks { results, next } = links;

        if !next.is_empty() && results.is_empty() {
            return Err(ScrapeError::BrokenSelector {
                url: url.to_string(),
                selector: result_selector.to_string(),
            });
        }

        let before = self.visited.len();
        self.visited.extend(results);
        let new_links = self.visited.len() - before;

        if new_links == 0 {
            self.current_url = None;
            return Ok(PageOutcome::Converged);
        }

        if next.is_empty() {
            self.current_url = None;
            return Ok(PageOutcome::Exhausted { new_links });
        }

        let next_url = Url::parse(&next)
            .map_err(|e| ScrapeError::navigation(&next, format!("invalid next-page link: {e}")))?;
        self.current_url = Some(next_url);
        self.page_count += 1;
        Ok(PageOutcome::Continue { new_links })
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[must_use]
    pub fn link_count(&self) -> usize {
        self.visited.len()
    }

    #[must_use]
    pub fn into_links(self) -> HashSet<String> {
        self.visited
    }
}
