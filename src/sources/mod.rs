//! Source registry
//!
//! Static, read-only table of the search engines links can be harvested
//! from. Lookups happen while planning a run, before any browser work, so an
//! unknown id never costs a navigation.

mod descriptor;
mod engines;

pub use descriptor::{PreNavigation, SearchOperators, SourceDescriptor, UrlBuilder};

use crate::error::{ScrapeError, ScrapeResult};

pub const GOOGLE: SourceDescriptor = SourceDescriptor {
    id: "google",
    result_selector: "#search a[ping]:not(.fl)",
    next_page_selector: Some("#pnnext"),
    page_size: 100,
    build_url: engines::google,
    pre_navigation: None,
};

pub const BING: SourceDescriptor = SourceDescriptor {
    id: "bing",
    result_selector: "#b_results > li > h2 > a, #b_results > li > div > h2 > a",
    next_page_selector: Some(r#"a[title="Next page"]"#),
    page_size: 50,
    build_url: engines::bing,
    pre_navigation: None,
};

pub const YAHOO: SourceDescriptor = SourceDescriptor {
    id: "yahoo",
    result_selector: "a.ac-algo",
    next_page_selector: Some("a.next"),
    page_size: 50,
    build_url: engines::yahoo,
    pre_navigation: Some(PreNavigation::ClickThrough {
        url: "https://se.search.yahoo.com",
        selector: r#"button[name="agree"]"#,
    }),
};

/// Every registered source, in default crawl order
pub static SOURCES: &[SourceDescriptor] = &[GOOGLE, BING, YAHOO];

/// Look up a source by id.
///
/// # Errors
///
/// Returns [`ScrapeError::Configuration`] listing the supported ids when `id`
/// is not registered.
pub fn lookup(id: &str) -> ScrapeResult<&'static SourceDescriptor> {
    SOURCES.iter().find(|s| s.id == id).ok_or_else(|| {
        ScrapeError::Configuration(format!(
            "unknown source '{id}' (supported: {})",
            source_ids().join(", ")
        ))
    })
}

/// Ids of all registered sources
#[must_use]
pub fn source_ids() -> Vec<&'static str> {
    SOURCES.iter().map(|s| s.id).collect()
}
