//! Fetch engine module
//!
//! The pagination loop every resource goes through.
//!
//! # Overview
//!
//! `FetchEngine::fetch_all` drives the session against one endpoint:
//! request a page at the cursor, parse the envelope, explode nested lists
//! when the query asks for it, append, and advance by the limit the server
//! reported until the termination rule says the sequence is exhausted.
//! Pages are fetched strictly one after another; a page-count cap and an
//! optional deadline bound the loop, since `total` and `limit` come from the
//! server and are not trusted to converge.

mod types;

pub use types::{FetchLimits, FetchOutcome, FetchStats};

use crate::catalog::ResourceQuery;
use crate::error::{Error, Result};
use crate::flatten::flatten;
use crate::http::{RequestConfig, Session};
use crate::pagination::{Cursor, Envelope, Pagination, SkipPaginator};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// Drives paginated fetches through a session
#[derive(Debug, Clone, Copy)]
pub struct FetchEngine<'a> {
    session: &'a Session,
    limits: FetchLimits,
}

impl<'a> FetchEngine<'a> {
    /// Create an engine with default limits
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            limits: FetchLimits::default(),
        }
    }

    /// Set fetch limits
    #[must_use]
    pub fn with_limits(mut self, limits: FetchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the fetch limits
    pub fn limits(&self) -> &FetchLimits {
        &self.limits
    }

    /// Fetch every record of a resource.
    ///
    /// Returns the records in server order, exploded when the query carries
    /// a `FlattenSpec` and deduplicated per page when it names a dedupe
    /// field. Any failure discards what was accumulated.
    pub async fn fetch_all(&self, query: &ResourceQuery) -> Result<FetchOutcome> {
        let start = Instant::now();
        let base = query.base_params()?;

        let (records, pages) = match &query.pagination {
            Pagination::Single => (self.fetch_single(query, &base, start).await?, 1),
            Pagination::Skip(paginator) => {
                self.fetch_pages(query, paginator, &base, start).await?
            }
        };

        let stats = FetchStats {
            pages,
            records: records.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Fetched {} {} records in {} pages ({}ms)",
            stats.records, query.name, stats.pages, stats.duration_ms
        );

        Ok(FetchOutcome { records, stats })
    }

    async fn fetch_single(
        &self,
        query: &ResourceQuery,
        base: &[(String, String)],
        start: Instant,
    ) -> Result<Vec<Value>> {
        let body = self.request(query, base.to_vec(), start).await?;
        let values = Envelope::parse_values(&query.path, body)?;
        debug!("{}: single page of {} records", query.name, values.len());
        prepare_page(query, values)
    }

    async fn fetch_pages(
        &self,
        query: &ResourceQuery,
        paginator: &SkipPaginator,
        base: &[(String, String)],
        start: Instant,
    ) -> Result<(Vec<Value>, u32)> {
        let mut cursor = Cursor::starting_at(query.start_skip);
        let mut records = Vec::new();

        loop {
            if cursor.pages_fetched >= self.limits.max_pages {
                return Err(Error::PageLimitExceeded {
                    endpoint: query.path.clone(),
                    max_pages: self.limits.max_pages,
                });
            }

            let mut params = base.to_vec();
            params.extend(paginator.params(&cursor));

            let skip = cursor.next_skip;
            let body = self.request(query, params, start).await?;
            let envelope = Envelope::parse(&query.path, body)?;
            let next = paginator.process_page(&query.path, &envelope, &mut cursor)?;

            debug!(
                "{}: page {} at skip {} returned {} records (limit {}, total {})",
                query.name,
                cursor.pages_fetched,
                skip,
                envelope.values.len(),
                envelope.limit,
                envelope.total
            );

            records.extend(prepare_page(query, envelope.values)?);

            if next.is_done() {
                break;
            }
        }

        Ok((records, cursor.pages_fetched))
    }

    /// Issue one GET, bounded by whatever is left of the deadline
    async fn request(
        &self,
        query: &ResourceQuery,
        params: Vec<(String, String)>,
        start: Instant,
    ) -> Result<Value> {
        let config = params
            .into_iter()
            .fold(RequestConfig::new(), |config, (key, value)| config.query(key, value));
        let request = self.session.get_json(&query.path, config);

        match self.limits.deadline {
            None => request.await,
            Some(deadline) => {
                let remaining = deadline.saturating_sub(start.elapsed());
                if remaining.is_zero() {
                    return Err(deadline_exceeded(query, start));
                }
                tokio::time::timeout(remaining, request)
                    .await
                    .map_err(|_| deadline_exceeded(query, start))?
            }
        }
    }
}

/// Per-page reshaping: dedupe within the page, then explode nested lists
fn prepare_page(query: &ResourceQuery, mut values: Vec<Value>) -> Result<Vec<Value>> {
    query.dedupe_page(&mut values);
    match &query.flatten {
        Some(spec) => flatten(&values, spec),
        None => Ok(values),
    }
}

fn deadline_exceeded(query: &ResourceQuery, start: Instant) -> Error {
    Error::DeadlineExceeded {
        endpoint: query.path.clone(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}
