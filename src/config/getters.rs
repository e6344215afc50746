//! Getter methods for `ScrapeConfig`

use std::path::Path;

use super::types::ScrapeConfig;
use crate::aggregator::LinkTransform;

impl ScrapeConfig {
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    #[must_use]
    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    #[must_use]
    pub fn link_transform(&self) -> LinkTransform {
        self.link_transform
    }

    #[must_use]
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn page_limit(&self) -> Option<usize> {
        self.page_limit
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn page_load_timeout_secs(&self) -> u64 {
        self.page_load_timeout_secs
    }
}
