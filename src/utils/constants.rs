//! Shared configuration constants for serp_links
//!
//! Default values used by the configuration builder, the CLI and the
//! Chromium renderer, kept in one place to avoid magic numbers.

/// `Accept-Language` header sent with every navigation
///
/// Pins the result locale so the same query renders the same DOM structure
/// (and the same selectors keep matching) regardless of the host machine.
pub const ACCEPT_LANGUAGE: &str = "en-GB,en-US;q=0.9,en;q=0.8";

/// Document file types searched by the document scraper when none are given
pub const DEFAULT_FILE_TYPES: &[&str] = &["pdf", "docx", "xlsx", "pptx", "doc", "xls", "ppt"];

/// Default number of combinations crawled at the same time: 1
///
/// One crawl at a time bounds browser memory to a single incognito context.
/// Raising it never changes the output, only the wall-clock time.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Default timeout for a single page navigation: 30 seconds
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// Upper bound on waiting for results rendered after the load event
///
/// A page that shows neither results nor a next-page control by then is
/// extracted as it is.
pub const RESULTS_WAIT_TIMEOUT_SECS: u64 = 5;

/// Interval between checks for rendered results
pub const RESULTS_POLL_INTERVAL_MS: u64 = 100;

/// CDP request timeout for the launched browser
pub const BROWSER_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Window size used for both headless and headed sessions
pub const BROWSER_WINDOW_SIZE: (u32, u32) = (1920, 1080);
