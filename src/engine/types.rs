//! Engine types
//!
//! Limits and results of a fetch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Default cap on pages per fetch
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Bounds on a single `fetch_all`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchLimits {
    /// Maximum number of pages before the fetch fails
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    /// Wall-clock budget for the whole fetch
    #[serde(default, with = "duration_secs")]
    pub deadline: Option<Duration>,
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            deadline: None,
        }
    }
}

impl FetchLimits {
    /// Create default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Statistics from one fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    /// Pages requested
    pub pages: u32,
    /// Rows produced (after flattening)
    pub records: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Records of one resource and how they were fetched
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// Records in server order
    pub records: Vec<Value>,
    /// Fetch statistics
    pub stats: FetchStats,
}

/// Optional durations as whole seconds in config files
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
