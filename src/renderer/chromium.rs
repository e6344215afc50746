//! Chromium renderer
//!
//! Owns one launched browser process. Every crawl gets its own incognito
//! browser context (CDP `Target.createBrowserContext`) holding a single page,
//! so cookies, consent state and history never leak between crawls.

use anyhow::Context as _;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::EventFrameNavigated;
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use super::browser_setup::launch_browser;
use super::js_scripts::{links_script, presence_script};
use super::page_timeout::{poll_until, with_page_timeout};
use super::{PageLinks, RenderContext, Renderer};
use crate::error::{ScrapeError, ScrapeResult};
use crate::utils::constants::{
    ACCEPT_LANGUAGE, RESULTS_POLL_INTERVAL_MS, RESULTS_WAIT_TIMEOUT_SECS,
};

/// How long [`Drop`] waits for a killed browser to exit before removing its profile
const KILL_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// A launched Chromium process and its CDP event handler task.
///
/// The handler MUST be aborted once the browser is done, otherwise it keeps
/// polling a dead connection. If [`shutdown`](Self::shutdown) was not called,
/// `Drop` aborts it, kills the browser and then removes the temporary profile
/// directory.
pub struct ChromiumRenderer {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
    page_load_timeout_secs: u64,
}

impl ChromiumRenderer {
    /// Launch a browser, headless unless `headless` is false.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Browser`] when no executable can be found or
    /// downloaded, or the process fails to start.
    pub async fn launch(headless: bool, page_load_timeout_secs: u64) -> ScrapeResult<Self> {
        let launched = launch_browser(headless).await?;
        Ok(Self {
            browser: launched.browser,
            handler: launched.handler,
            user_data_dir: Some(launched.user_data_dir),
            page_load_timeout_secs,
        })
    }

    /// Temporary profile directory, `None` once it has been removed
    #[must_use]
    pub fn profile_dir(&self) -> Option<&Path> {
        self.user_data_dir.as_deref()
    }

    /// Close the browser, wait for the process to exit and remove its profile.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Browser`] if the close command fails. The
    /// profile directory is removed either way.
    pub async fn shutdown(mut self) -> ScrapeResult<()> {
        info!("Shutting down browser");

        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| ScrapeError::Browser(format!("Failed to close browser cleanly: {e}")));

        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
        }

        self.cleanup_temp_dir();
        closed
    }

    /// Remove the temporary profile directory.
    ///
    /// Must run after the browser process has exited, or locked files may
    /// survive on Windows.
    fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            debug!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for ChromiumRenderer {
    fn drop(&mut self) {
        self.handler.abort();

        if self.user_data_dir.is_some() {
            warn!("ChromiumRenderer dropped without shutdown - killing browser and removing temp dir");
            self.kill_process();
            self.cleanup_temp_dir();
        }
    }
}

impl ChromiumRenderer {
    /// Kill the browser process and block until it exits or the grace period ends.
    ///
    /// Only used on the [`Drop`] path, where the async `close` is unavailable.
    /// Chromium holds its profile directory open until it has exited.
    fn kill_process(&mut self) {
        let Some(child) = self.browser.get_mut_child() else {
            return;
        };
        let process = child.as_mut_inner();
        if let Err(e) = process.start_kill() {
            debug!("Failed to signal browser process: {e}");
        }

        let deadline = std::time::Instant::now() + KILL_GRACE_PERIOD;
        while std::time::Instant::now() < deadline {
            match process.try_wait() {
                Ok(Some(_)) | Err(_) => return,
                Ok(None) => std::thread::sleep(Duration::from_millis(20)),
            }
        }
        warn!("Browser process still running after kill");
    }
}

impl Renderer for ChromiumRenderer {
    type Context<'a> = ChromiumContext<'a>;

    async fn new_isolated_context(&self) -> ScrapeResult<ChromiumContext<'_>> {
        let context_id = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(|e| ScrapeError::Browser(format!("Failed to create browser context: {e}")))?
            .result
            .browser_context_id;

        match open_page(&self.browser, &context_id).await {
            Ok(page) => {
                debug!(context = ?context_id, "Opened isolated browsing context");
                Ok(ChromiumContext {
                    browser: &self.browser,
                    context_id,
                    page,
                    page_load_timeout_secs: self.page_load_timeout_secs,
                })
            }
            Err(e) => {
                dispose_context(&self.browser, context_id).await;
                Err(e)
            }
        }
    }
}

/// Create a blank page inside `context_id` with the locale header installed
async fn open_page(browser: &Browser, context_id: &BrowserContextId) -> ScrapeResult<Page> {
    let params = CreateTargetParams::builder()
        .url("about:blank")
        .browser_context_id(context_id.clone())
        .build()
        .map_err(|e| ScrapeError::Browser(format!("Invalid target parameters: {e}")))?;

    let page = browser
        .new_page(params)
        .await
        .map_err(|e| ScrapeError::Browser(format!("Failed to create page: {e}")))?;

    let headers = Headers::new(serde_json::json!({ "Accept-Language": ACCEPT_LANGUAGE }));
    if let Err(e) = page.execute(SetExtraHttpHeadersParams::new(headers)).await {
        // The page is unusable for a consistent locale; release it before failing
        if let Err(close_err) = page.close().await {
            debug!("Failed to close page after header error: {close_err}");
        }
        return Err(ScrapeError::Browser(format!(
            "Failed to set Accept-Language header: {e}"
        )));
    }

    Ok(page)
}

async fn dispose_context(browser: &Browser, context_id: BrowserContextId) {
    if let Err(e) = browser
        .execute(DisposeBrowserContextParams::new(context_id))
        .await
    {
        warn!("Failed to dispose browser context: {e}");
    }
}

/// One incognito browser context with a single page
pub struct ChromiumContext<'a> {
    browser: &'a Browser,
    context_id: BrowserContextId,
    page: Page,
    page_load_timeout_secs: u64,
}

impl RenderContext for ChromiumContext<'_> {
    async fn navigate(&mut self, url: &Url) -> ScrapeResult<()> {
        let page = &self.page;
        with_page_timeout(
            async {
                page.goto(url.as_str())
                    .await
                    .context("Failed to navigate")?;
                Ok::<(), anyhow::Error>(())
            },
            self.page_load_timeout_secs,
            "Page load",
        )
        .await
        .map_err(|e| ScrapeError::navigation(url.as_str(), format!("{e:#}")))
    }

    async fn extract(
        &mut self,
        result_selector: &str,
        next_page_selector: &str,
    ) -> ScrapeResult<PageLinks> {
        let url = self.page.url().await.ok().flatten().unwrap_or_default();

        // The load event can fire before script-rendered results exist
        let page = &self.page;
        let presence = presence_script(result_selector, next_page_selector);
        let presence = presence.as_str();
        let rendered = poll_until(
            move || async move {
                match page.evaluate(presence).await {
                    Ok(found) => found.into_value::<bool>().unwrap_or(false),
                    Err(_) => false,
                }
            },
            Duration::from_secs(RESULTS_WAIT_TIMEOUT_SECS),
            Duration::from_millis(RESULTS_POLL_INTERVAL_MS),
        )
        .await;
        if !rendered {
            debug!(url = %url, "No results or next-page control appeared, extracting as is");
        }

        self.page
            .evaluate(links_script(result_selector, next_page_selector))
            .await
            .map_err(|e| ScrapeError::navigation(&url, format!("Link extraction script failed: {e}")))?
            .into_value::<PageLinks>()
            .map_err(|e| ScrapeError::navigation(&url, format!("Unexpected extraction result: {e}")))
    }

    async fn click_through(&mut self, url: &str, selector: &str) -> ScrapeResult<()> {
        let page = &self.page;
        with_page_timeout(
            async {
                page.goto(url).await.context("Failed to open pre-navigation page")?;
                let button = page
                    .find_element(selector)
                    .await
                    .with_context(|| format!("Element '{selector}' not found"))?;

                // Must subscribe before the click; right after it the old page
                // still counts as loaded
                let mut navigations = page
                    .event_listener::<EventFrameNavigated>()
                    .await
                    .context("Failed to listen for navigation events")?;
                button
                    .click()
                    .await
                    .with_context(|| format!("Failed to click '{selector}'"))?;

                loop {
                    let event = navigations
                        .next()
                        .await
                        .context("Event stream ended before the click navigated")?;
                    if event.frame.parent_id.is_none() {
                        debug!(to = %event.frame.url, "Pre-navigation click navigated");
                        break;
                    }
                }
                page.wait_for_navigation()
                    .await
                    .context("Failed to wait for page load after click")?;
                Ok::<(), anyhow::Error>(())
            },
            self.page_load_timeout_secs,
            "Pre-navigation",
        )
        .await
        .map_err(|e| ScrapeError::navigation(url, format!("{e:#}")))
    }

    async fn close(self) -> ScrapeResult<()> {
        let closed = self
            .page
            .close()
            .await
            .map_err(|e| ScrapeError::Browser(format!("Failed to close page: {e}")));

        dispose_context(self.browser, self.context_id).await;
        closed
    }
}
