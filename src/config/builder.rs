//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! A domain must be supplied before `build()` becomes available.

use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::ScrapeConfig;
use crate::aggregator::LinkTransform;
use crate::error::{ScrapeError, ScrapeResult};
use crate::sources;
use crate::utils::{DEFAULT_CONCURRENCY, DEFAULT_PAGE_LOAD_TIMEOUT_SECS};

// Type states for the builder
pub struct WithDomain;

pub struct ScrapeConfigBuilder<State = ()> {
    domain: Option<String>,
    sources: Vec<String>,
    file_types: Vec<String>,
    link_transform: LinkTransform,
    output_file: Option<PathBuf>,
    headless: bool,
    page_limit: Option<usize>,
    concurrency: usize,
    page_load_timeout_secs: u64,
    _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            domain: None,
            sources: sources::source_ids().into_iter().map(String::from).collect(),
            file_types: Vec::new(),
            link_transform: LinkTransform::Absolute,
            output_file: None,
            headless: true,
            page_limit: None,
            concurrency: DEFAULT_CONCURRENCY,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn domain(self, domain: impl Into<String>) -> ScrapeConfigBuilder<WithDomain> {
        ScrapeConfigBuilder {
            domain: Some(domain.into().trim().to_string()),
            sources: self.sources,
            file_types: self.file_types,
            link_transform: self.link_transform,
            output_file: self.output_file,
            headless: self.headless,
            page_limit: self.page_limit,
            concurrency: self.concurrency,
            page_load_timeout_secs: self.page_load_timeout_secs,
            _phantom: PhantomData,
        }
    }
}

impl<State> ScrapeConfigBuilder<State> {
    /// Source ids to crawl; defaults to every registered source
    #[must_use]
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn file_types<I, S>(mut self, file_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_types = file_types.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn link_transform(mut self, transform: LinkTransform) -> Self {
        self.link_transform = transform;
        self
    }

    #[must_use]
    pub fn output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn page_limit(mut self, limit: Option<usize>) -> Self {
        self.page_limit = limit;
        self
    }

    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.page_load_timeout_secs = secs;
        self
    }
}

impl ScrapeConfigBuilder<WithDomain> {
    /// Validate and build the config.
    ///
    /// Source ids are not resolved here; unknown ids surface as per-combination
    /// configuration failures so the known sources still run.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Configuration`] for an empty or whitespace-laden
    /// domain, no sources, an empty file type, zero concurrency or a zero
    /// timeout.
    pub fn build(self) -> ScrapeResult<ScrapeConfig> {
        let domain = self.domain.unwrap_or_default();
        if domain.is_empty() || domain.chars().any(char::is_whitespace) {
            return Err(ScrapeError::Configuration(format!(
                "invalid domain '{domain}'"
            )));
        }

        if self.sources.is_empty() {
            return Err(ScrapeError::Configuration(
                "at least one source is required".to_string(),
            ));
        }

        if self.file_types.iter().any(|ft| ft.trim().is_empty()) {
            return Err(ScrapeError::Configuration(
                "file types must not be empty".to_string(),
            ));
        }

        if self.concurrency == 0 {
            return Err(ScrapeError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if self.page_load_timeout_secs == 0 {
            return Err(ScrapeError::Configuration(
                "page load timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(ScrapeConfig {
            domain,
            sources: self.sources,
            file_types: self.file_types,
            link_transform: self.link_transform,
            output_file: self.output_file,
            headless: self.headless,
            page_limit: self.page_limit,
            concurrency: self.concurrency,
            page_load_timeout_secs: self.page_load_timeout_secs,
        })
    }
}
