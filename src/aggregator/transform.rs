//! Post-processing applied to every extracted link before aggregation

use serde::{Deserialize, Serialize};

use crate::utils::path_and_query;

/// How extracted links are stored in the aggregate set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTransform {
    /// Keep the absolute URL as extracted
    #[default]
    Absolute,
    /// Keep only path and query (`/docs/a.pdf?x=1`). Links that differ only
    /// by scheme or host merge into one entry.
    PathAndQuery,
}

impl LinkTransform {
    /// Apply the transform, `None` when the link cannot be transformed
    #[must_use]
    pub fn apply(self, link: &str) -> Option<String> {
        match self {
            Self::Absolute => Some(link.to_string()),
            Self::PathAndQuery => path_and_query(link),
        }
    }
}
