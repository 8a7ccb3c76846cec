//! Pagination strategy implementations
//!
//! The partner API only speaks one pattern (skip/limit/total) but each
//! endpoint names the offset parameter differently, may or may not accept a
//! page size, and ends the sequence under one of two rules.

use super::types::{Cursor, Envelope, NextPage};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Termination Rule
// ============================================================================

/// When a skip/limit/total sequence is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationRule {
    /// Stop once the skip used for the page just fetched is at or past
    /// `total`. The endpoint is asked for one trailing page past the end.
    #[default]
    CurrentSkip,
    /// Stop once `skip + limit` of the page just fetched reaches `total`.
    NextSkip,
}

impl TerminationRule {
    /// Whether the page fetched at `skip` with reported `limit` ends the sequence
    pub fn is_exhausted(self, skip: u64, limit: u64, total: u64) -> bool {
        match self {
            TerminationRule::CurrentSkip => skip >= total,
            TerminationRule::NextSkip => skip.saturating_add(limit) >= total,
        }
    }
}

// ============================================================================
// Skip Paginator
// ============================================================================

/// Offset pagination driven by the server-reported `limit` and `total`
///
/// Common patterns:
/// - `?skip=100`
/// - `?start=200&limit=200`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPaginator {
    /// Query parameter name for the offset
    pub skip_param: String,
    /// Query parameter name for the page size, if the endpoint takes one
    pub limit_param: Option<String>,
    /// Requested page size
    pub page_size: Option<u32>,
    /// End-of-sequence rule
    pub termination: TerminationRule,
}

impl SkipPaginator {
    /// Create a paginator that only sends an offset
    pub fn new(skip_param: impl Into<String>, termination: TerminationRule) -> Self {
        Self {
            skip_param: skip_param.into(),
            limit_param: None,
            page_size: None,
            termination,
        }
    }

    /// Also send a page size
    #[must_use]
    pub fn with_limit(mut self, limit_param: impl Into<String>, page_size: u32) -> Self {
        self.limit_param = Some(limit_param.into());
        self.page_size = Some(page_size);
        self
    }

    /// Override the requested page size, keeping the parameter name
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if self.limit_param.is_some() {
            self.page_size = Some(page_size);
        }
        self
    }

    /// Query parameters for the request at the cursor's position
    pub fn params(&self, cursor: &Cursor) -> Vec<(String, String)> {
        let mut params = vec![(self.skip_param.clone(), cursor.next_skip.to_string())];
        if let (Some(param), Some(size)) = (&self.limit_param, self.page_size) {
            params.push((param.clone(), size.to_string()));
        }
        params
    }

    /// Account for a fetched page and decide whether to continue.
    ///
    /// The cursor advances by the limit the server reports, not the one that
    /// was requested.
    pub fn process_page(
        &self,
        endpoint: &str,
        envelope: &Envelope,
        cursor: &mut Cursor,
    ) -> Result<NextPage> {
        let skip = cursor.next_skip;
        cursor.pages_fetched += 1;
        cursor.records_fetched += envelope.values.len() as u64;

        if self
            .termination
            .is_exhausted(skip, envelope.limit, envelope.total)
        {
            return Ok(NextPage::Done);
        }

        if envelope.limit == 0 {
            return Err(Error::malformed(
                endpoint,
                format!(
                    "server reported limit 0 at skip {skip} with total {}",
                    envelope.total
                ),
            ));
        }

        cursor.next_skip = skip.checked_add(envelope.limit).ok_or_else(|| {
            Error::malformed(
                endpoint,
                format!(
                    "cursor overflow: limit {} at skip {skip} cannot advance",
                    envelope.limit
                ),
            )
        })?;
        Ok(NextPage::Continue {
            skip: cursor.next_skip,
        })
    }
}

// ============================================================================
// Pagination mode
// ============================================================================

/// How a resource is fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// One unparameterised GET whose `values` is the whole listing
    Single,
    /// Skip/limit/total pagination
    Skip(SkipPaginator),
}

impl Pagination {
    /// Get the skip paginator, if any
    pub fn paginator(&self) -> Option<&SkipPaginator> {
        match self {
            Pagination::Single => None,
            Pagination::Skip(p) => Some(p),
        }
    }
}
