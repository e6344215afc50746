//! Command-line surface shared by the `document-scraper` and `path-scraper`
//! binaries.

use clap::{Args, Parser};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::aggregator::{self, LinkTransform};
use crate::config::{ScrapeConfig, ScrapeConfigBuilder, WithDomain};
use crate::error::ScrapeResult;
use crate::output::write_links;
use crate::renderer::ChromiumRenderer;
use crate::sources;
use crate::utils::{DEFAULT_CONCURRENCY, DEFAULT_FILE_TYPES, DEFAULT_PAGE_LOAD_TIMEOUT_SECS};

fn default_sources() -> Vec<String> {
    sources::source_ids().into_iter().map(String::from).collect()
}

fn default_file_types() -> Vec<String> {
    DEFAULT_FILE_TYPES.iter().map(|ft| (*ft).to_string()).collect()
}

/// Options common to both scrapers
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// The domain which to scrape for links
    pub domain: String,

    /// A file path at which a file listing the resulting links is to be created
    #[arg(short, long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Sources from where to extract links (default: all registered)
    #[arg(short, long, num_args = 1.., default_values_t = default_sources())]
    pub sources: Vec<String>,

    /// Display the browser window when scraping
    #[arg(short = 'w', long)]
    pub show_window: bool,

    /// Maximum number of result pages rendered per crawl
    #[arg(short, long)]
    pub page_limit: Option<usize>,

    /// Number of crawls run at the same time
    #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Page load timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_PAGE_LOAD_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl CommonArgs {
    fn into_builder(self) -> ScrapeConfigBuilder<WithDomain> {
        ScrapeConfig::builder()
            .domain(self.domain)
            .sources(self.sources)
            .output_file(self.output_file)
            .headless(!self.show_window)
            .page_limit(self.page_limit)
            .concurrency(self.concurrency)
            .page_load_timeout_secs(self.timeout_secs)
    }
}

/// Scrape search engines for links to documents hosted on a domain
#[derive(Debug, Clone, Parser)]
#[command(name = "document-scraper", version)]
pub struct DocumentArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// A list of file types to retrieve links for
    #[arg(short, long, num_args = 1.., default_values_t = default_file_types())]
    pub file_types: Vec<String>,
}

impl DocumentArgs {
    /// # Errors
    ///
    /// Returns a configuration error for invalid values.
    pub fn into_config(self) -> ScrapeResult<ScrapeConfig> {
        self.common
            .into_builder()
            .file_types(self.file_types)
            .link_transform(LinkTransform::Absolute)
            .build()
    }
}

/// Scrape search engines for the paths indexed on a domain
#[derive(Debug, Clone, Parser)]
#[command(name = "path-scraper", version)]
pub struct PathArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl PathArgs {
    /// # Errors
    ///
    /// Returns a configuration error for invalid values.
    pub fn into_config(self) -> ScrapeResult<ScrapeConfig> {
        self.common
            .into_builder()
            .link_transform(LinkTransform::PathAndQuery)
            .build()
    }
}

/// Launch the browser, scrape, shut the browser down and write the results.
///
/// `noun` names the results in the summary line ("document links", "paths").
/// Per-combination failures are logged and do not make this fail.
///
/// # Errors
///
/// Fails if the browser cannot be launched or the output cannot be written.
pub async fn run(config: &ScrapeConfig, noun: &str) -> anyhow::Result<()> {
    let renderer = ChromiumRenderer::launch(config.headless(), config.page_load_timeout_secs()).await?;

    let outcome = aggregator::scrape(&renderer, config).await;

    if let Err(e) = renderer.shutdown().await {
        warn!("{e}");
    }

    for failure in &outcome.failures {
        warn!("Failed: {failure}");
    }
    info!("Retrieved {} unique {noun}.", outcome.links.len());

    write_links(&outcome.links, config.output_file()).await?;
    Ok(())
}
