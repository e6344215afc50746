//! Core configuration type for a scraping run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::aggregator::LinkTransform;

/// Everything one top-level scraping run needs
///
/// Build it with [`ScrapeConfig::builder`]; the builder refuses to produce a
/// config without a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Domain passed to the `site:` operator.
    ///
    /// **INVARIANT:** trimmed, non-empty, no whitespace.
    pub(crate) domain: String,

    /// Source ids to crawl, in order. Unknown ids are kept and reported per
    /// combination when the run is planned.
    pub(crate) sources: Vec<String>,

    /// Values for the `filetype:` operator. Empty means one crawl per source
    /// without a file-type restriction.
    pub(crate) file_types: Vec<String>,

    pub(crate) link_transform: LinkTransform,

    /// Where to write the link list; stdout when `None`
    pub(crate) output_file: Option<PathBuf>,

    pub(crate) headless: bool,

    /// Maximum pages rendered per crawl; `None` follows next-page links
    /// until convergence
    pub(crate) page_limit: Option<usize>,

    /// Maximum combinations crawled at the same time
    ///
    /// Default: 1 (sequential)
    pub(crate) concurrency: usize,

    /// Timeout in seconds for a single navigation
    ///
    /// Default: 30 seconds
    pub(crate) page_load_timeout_secs: u64,
}
