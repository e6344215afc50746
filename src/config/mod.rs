//! Configuration for a scraping run
//!
//! `ScrapeConfig` plus its typestate builder, with validation and defaults
//! taken from [`crate::utils::constants`].

pub mod builder;
pub mod getters;
pub mod types;

pub use builder::{ScrapeConfigBuilder, WithDomain};
pub use types::ScrapeConfig;
