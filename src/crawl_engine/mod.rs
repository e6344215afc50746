//! Pagination engine
//!
//! Drives one source through its result pages. See [`crawl`].

pub mod crawler;
pub mod session;

pub use crawler::crawl;
pub use session::{CrawlSession, PageOutcome};
