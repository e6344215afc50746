//! Paginated link extraction
//!
//! Renders a results page, reads result links and the next-page link in one
//! DOM pass, and follows next-page links until the source runs out of pages,
//! a page adds nothing new, or the page limit is hit.

use std::collections::HashSet;
use tracing::{debug, info, warn};
use url::Url;

use super::session::{CrawlSession, PageOutcome};
use crate::error::{ScrapeError, ScrapeResult};
use crate::renderer::{RenderContext, Renderer};
use crate::sources::{PreNavigation, SourceDescriptor};

/// Collect every result link reachable from `start_url` by following
/// next-page links.
///
/// Runs in a fresh isolated context that is closed on every exit path. The
/// descriptor's pre-navigation step, if any, runs once before the first page.
/// `page_limit` caps the number of rendered pages; `None` is unbounded.
///
/// # Errors
///
/// * [`ScrapeError::Configuration`] - empty result selector, raised before
///   any navigation
/// * [`ScrapeError::BrokenSelector`] - a page had a next-page link but no
///   results; partial results are discarded
/// * [`ScrapeError::Navigation`] / [`ScrapeError::Browser`] - rendering failed
///   (not retried)
pub async fn crawl<R: Renderer>(
    renderer: &R,
    descriptor: &SourceDescriptor,
    start_url: Url,
    page_limit: Option<usize>,
) -> ScrapeResult<HashSet<String>> {
    if descriptor.result_selector.trim().is_empty() {
        return Err(ScrapeError::Configuration(format!(
            "source '{}' has an empty result selector",
            descriptor.id
        )));
    }

    let mut context = renderer.new_isolated_context().await?;
    let session = CrawlSession::new(start_url, page_limit);
    let outcome = paginate(&mut context, descriptor, session).await;

    if let Err(e) = context.close().await {
        warn!(source = descriptor.id, "Failed to release browsing context: {e}");
    }

    outcome
}

async fn paginate<C: RenderContext>(
    context: &mut C,
    descriptor: &SourceDescriptor,
    mut session: CrawlSession,
) -> ScrapeResult<HashSet<String>> {
    if let Some(PreNavigation::ClickThrough { url, selector }) = descriptor.pre_navigation {
        debug!(source = descriptor.id, "Pre-navigation: clicking '{selector}' at {url}");
        context.click_through(url, selector).await?;
    }

    let mut rendered = 0usize;
    while let Some(url) = session.next_target().cloned() {
        info!(source = descriptor.id, "Retrieving {url}...");
        context.navigate(&url).await?;
        rendered += 1;

        let links = context
            .extract(descriptor.result_selector, descriptor.next_selector())
            .await?;
        let found = links.results.len();

        match session.record_page(&url, links, descriptor.result_selector)? {
            PageOutcome::Continue { new_links } => {
                debug!(source = descriptor.id, found, new_links, "Following next page");
            }
            PageOutcome::Exhausted { new_links } => {
                debug!(source = descriptor.id, found, new_links, "No next page");
            }
            PageOutcome::Converged => {
                debug!(source = descriptor.id, found, "Page added no new links, stopping");
            }
        }
    }

    info!(
        source = descriptor.id,
        pages = rendered,
        links = session.link_count(),
        "Crawl finished"
    );
    Ok(session.into_links())
}
