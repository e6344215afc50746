//! Harvest result links from paginated search-engine result pages.
//!
//! A headless browser renders each results page, a per-source selector pair
//! reads the result links and the "next page" link, and the pagination
//! engine follows next-page links until the source is exhausted, a page adds
//! nothing new, or a page limit is hit.

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod crawl_engine;
pub mod error;
pub mod logging;
pub mod output;
pub mod renderer;
pub mod sources;
pub mod utils;

pub use aggregator::{
    AggregateOutcome, Combination, CombinationFailure, LinkTransform, plan, run_combinations,
    scrape,
};
pub use config::ScrapeConfig;
pub use crawl_engine::crawl;
pub use error::{ScrapeError, ScrapeResult};
pub use renderer::{ChromiumRenderer, PageLinks, RenderContext, Renderer};
pub use sources::{PreNavigation, SOURCES, SearchOperators, SourceDescriptor};
