//! Page rendering capability
//!
//! The pagination engine only needs four things from a browser: an isolated
//! context, navigation, a single-pass selector extraction and teardown. They
//! are expressed as traits so the engine runs unchanged against Chromium or
//! against scripted pages in tests.

mod browser_setup;
mod chromium;
mod js_scripts;
mod page_timeout;

pub use browser_setup::{
    BROWSER_PATH_ENV, LaunchedBrowser, download_managed_browser, find_browser_executable,
    launch_browser,
};
pub use chromium::{ChromiumContext, ChromiumRenderer};
pub use page_timeout::with_page_timeout;

use serde::{Deserialize, Serialize};
use std::future::Future;
use url::Url;

use crate::error::ScrapeResult;

/// Links read from one rendered page in a single DOM pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Resolved `href` of every anchor matching the result selector, in page order
    pub results: Vec<String>,
    /// Resolved `href` of the next-page anchor, empty when there is none
    pub next: String,
}

/// Factory for isolated browsing contexts.
///
/// Contexts created by one renderer never share cookies, storage or consent
/// state with each other.
pub trait Renderer: Sync {
    type Context<'a>: RenderContext
    where
        Self: 'a;

    fn new_isolated_context(&self) -> impl Future<Output = ScrapeResult<Self::Context<'_>>> + Send;
}

/// A single isolated browsing context with one page.
pub trait RenderContext: Send {
    /// Navigate to `url` and wait until the page has loaded.
    fn navigate(&mut self, url: &Url) -> impl Future<Output = ScrapeResult<()>> + Send;

    /// Read result links and the next-page link from the current DOM.
    ///
    /// Both selectors are evaluated in one call so they observe the same
    /// snapshot. An empty `next_page_selector` yields an empty `next`.
    fn extract(
        &mut self,
        result_selector: &str,
        next_page_selector: &str,
    ) -> impl Future<Output = ScrapeResult<PageLinks>> + Send;

    /// Open `url`, click the element matching `selector` and wait for the
    /// navigation it triggers.
    fn click_through(
        &mut self,
        url: &str,
        selector: &str,
    ) -> impl Future<Output = ScrapeResult<()>> + Send;

    /// Close the page and dispose of the context.
    fn close(self) -> impl Future<Output = ScrapeResult<()>> + Send;
}
