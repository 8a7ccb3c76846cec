//! Pagination types
//!
//! The response envelope and the cursor threaded through a fetch.

use crate::error::{Error, Result};
use serde_json::Value;

/// Result of processing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// Another page is needed, starting at `skip`
    Continue {
        /// Offset for the next request
        skip: u64,
    },
    /// The sequence is exhausted
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// One server response envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Records on this page, in server order
    pub values: Vec<Value>,
    /// Offset the server reports for this page, when present
    pub skip: Option<u64>,
    /// Page size the server actually applied
    pub limit: u64,
    /// Size of the full result set
    pub total: u64,
}

impl Envelope {
    /// Parse a paginated envelope. `values`, `limit` and `total` are required.
    pub fn parse(endpoint: &str, body: Value) -> Result<Self> {
        let Value::Object(mut map) = body else {
            return Err(Error::malformed(endpoint, "envelope is not a JSON object"));
        };

        let limit = required_count(endpoint, map.get("limit"), "limit")?;
        let total = required_count(endpoint, map.get("total"), "total")?;
        let skip = match map.get("skip") {
            None | Some(Value::Null) => None,
            Some(v) => Some(count(endpoint, v, "skip")?),
        };
        let values = take_values(endpoint, map.remove("values"))?;

        Ok(Self {
            values,
            skip,
            limit,
            total,
        })
    }

    /// Parse a single-shot listing, where only `values` is meaningful
    pub fn parse_values(endpoint: &str, body: Value) -> Result<Vec<Value>> {
        let Value::Object(mut map) = body else {
            return Err(Error::malformed(endpoint, "envelope is not a JSON object"));
        };
        take_values(endpoint, map.remove("values"))
    }
}

fn take_values(endpoint: &str, values: Option<Value>) -> Result<Vec<Value>> {
    match values {
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(Error::malformed(endpoint, "'values' is not an array")),
        None => Err(Error::malformed(endpoint, "missing key 'values'")),
    }
}

fn required_count(endpoint: &str, value: Option<&Value>, key: &str) -> Result<u64> {
    match value {
        Some(v) => count(endpoint, v, key),
        None => Err(Error::malformed(endpoint, format!("missing key '{key}'"))),
    }
}

fn count(endpoint: &str, value: &Value, key: &str) -> Result<u64> {
    value.as_u64().ok_or_else(|| {
        Error::malformed(
            endpoint,
            format!("'{key}' is not a non-negative integer: {value}"),
        )
    })
}

/// Mutable fetch state threaded through one pagination sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Offset for the next request
    pub next_skip: u64,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Records accumulated so far
    pub records_fetched: u64,
}

impl Cursor {
    /// Create a cursor starting at the given offset
    pub fn starting_at(skip: u64) -> Self {
        Self {
            next_skip: skip,
            ..Default::default()
        }
    }
}
