//! Multi-source aggregation
//!
//! Plans one crawl per (source, file type) pair, runs them through the
//! pagination engine with bounded concurrency and unions what succeeds.
//! A failing combination is logged and recorded; it never stops the others.

mod transform;

pub use transform::LinkTransform;

use futures::stream::{self, StreamExt};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::crawl_engine::crawl;
use crate::error::{ScrapeError, ScrapeResult};
use crate::renderer::Renderer;
use crate::sources::{self, SearchOperators, SourceDescriptor};

/// One planned crawl: a source queried for a domain, optionally restricted
/// to a file type
#[derive(Debug, Clone)]
pub struct Combination {
    pub source: &'static SourceDescriptor,
    pub file_type: Option<String>,
    pub start_url: Url,
}

impl Combination {
    /// Plan a crawl of `source` for `site:<domain>` and, when given,
    /// `filetype:<file_type>`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Configuration`] if the operators are malformed.
    pub fn new(
        source: &'static SourceDescriptor,
        domain: &str,
        file_type: Option<&str>,
    ) -> ScrapeResult<Self> {
        let mut operators = SearchOperators::site(domain);
        if let Some(ft) = file_type {
            operators = operators.with("filetype", ft);
        }

        Ok(Self {
            source,
            file_type: file_type.map(String::from),
            start_url: source.start_url(&operators)?,
        })
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_type {
            Some(ft) => write!(f, "{}/{ft}", self.source.id),
            None => f.write_str(self.source.id),
        }
    }
}

/// A combination that produced no links because of `error`
#[derive(Debug)]
pub struct CombinationFailure {
    pub source: String,
    pub file_type: Option<String>,
    pub error: ScrapeError,
}

impl fmt::Display for CombinationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file_type {
            Some(ft) => write!(f, "{}/{ft}: {}", self.source, self.error),
            None => write!(f, "{}: {}", self.source, self.error),
        }
    }
}

/// Union of all successful combinations plus every failure
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    pub links: BTreeSet<String>,
    pub failures: Vec<CombinationFailure>,
}

/// Resolve the config into crawlable combinations.
///
/// Unknown source ids and malformed operators become failures here, before
/// any navigation, and only drop the combinations they affect.
#[must_use]
pub fn plan(config: &ScrapeConfig) -> (Vec<Combination>, Vec<CombinationFailure>) {
    let mut combinations = Vec::new();
    let mut failures = Vec::new();

    let file_types: Vec<Option<&str>> = if config.file_types().is_empty() {
        vec![None]
    } else {
        config.file_types().iter().map(|ft| Some(ft.as_str())).collect()
    };

    for id in config.sources() {
        let source = match sources::lookup(id) {
            Ok(source) => source,
            Err(error) => {
                warn!(source = %id, "Skipping source: {error}");
                failures.push(CombinationFailure {
                    source: id.clone(),
                    file_type: None,
                    error,
                });
                continue;
            }
        };

        for file_type in &file_types {
            match Combination::new(source, config.domain(), *file_type) {
                Ok(combination) => combinations.push(combination),
                Err(error) => {
                    warn!(source = source.id, file_type = ?file_type, "Skipping combination: {error}");
                    failures.push(CombinationFailure {
                        source: source.id.to_string(),
                        file_type: file_type.map(String::from),
                        error,
                    });
                }
            }
        }
    }

    (combinations, failures)
}

/// Crawl every combination and union the results.
///
/// At most `concurrency` crawls run at once; each uses its own isolated
/// browsing context. Failures are reported in plan order.
pub async fn run_combinations<R: Renderer>(
    renderer: &R,
    combinations: Vec<Combination>,
    page_limit: Option<usize>,
    concurrency: usize,
    transform: LinkTransform,
) -> AggregateOutcome {
    let results: Vec<(Combination, ScrapeResult<HashSet<String>>)> = stream::iter(combinations)
        .map(|combination| async move {
            let result = crawl(
                renderer,
                combination.source,
                combination.start_url.clone(),
                page_limit,
            )
            .await;
            (combination, result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut outcome = AggregateOutcome::default();
    for (combination, result) in results {
        match result {
            Ok(links) => {
                info!(combination = %combination, links = links.len(), "Combination finished");
                merge_links(&mut outcome.links, links, transform);
            }
            Err(err) => {
                if err.is_per_crawl() {
                    warn!(
                        source = combination.source.id,
                        file_type = ?combination.file_type,
                        "Crawl failed: {err}"
                    );
                } else {
                    error!(
                        source = combination.source.id,
                        file_type = ?combination.file_type,
                        "Crawl failed: {err}"
                    );
                }
                outcome.failures.push(CombinationFailure {
                    source: combination.source.id.to_string(),
                    file_type: combination.file_type,
                    error: err,
                });
            }
        }
    }

    outcome
}

/// Plan and run a whole scraping run described by `config`.
pub async fn scrape<R: Renderer>(renderer: &R, config: &ScrapeConfig) -> AggregateOutcome {
    let (combinations, planning_failures) = plan(config);
    info!(
        domain = config.domain(),
        combinations = combinations.len(),
        "Starting scrape"
    );

    let mut outcome = run_combinations(
        renderer,
        combinations,
        config.page_limit(),
        config.concurrency(),
        config.link_transform(),
    )
    .await;

    let mut failures = planning_failures;
    failures.append(&mut outcome.failures);
    outcome.failures = failures;
    outcome
}

fn merge_links(target: &mut BTreeSet<String>, links: HashSet<String>, transform: LinkTransform) {
    let mut merged = 0usize;
    for link in links {
        match transform.apply(&link) {
            Some(value) => {
                if !target.insert(value) {
                    merged += 1;
                }
            }
            None => warn!("Skipping link that cannot be transformed: {link}"),
        }
    }
    if merged > 0 {
        debug!(merged, "Links already present in the aggregate set");
    }
}
