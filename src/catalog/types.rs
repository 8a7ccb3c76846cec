//! Resource query types

use crate::error::Result;
use crate::flatten::{normalize_all, FlattenSpec};
use crate::pagination::Pagination;
use crate::types::{DateEncoding, DateRange};
use serde_json::Value;
use std::collections::HashSet;

/// Date window parameters for a date-filtered endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParams {
    /// How the endpoint wants dates encoded
    pub encoding: DateEncoding,
    /// Parameter carrying the window start
    pub start_param: String,
    /// Parameter carrying the window end
    pub end_param: String,
    /// The window being requested
    pub range: DateRange,
}

impl DateParams {
    /// `startDate`/`endDate` parameters with the given encoding
    pub fn new(encoding: DateEncoding, range: DateRange) -> Self {
        Self {
            encoding,
            start_param: "startDate".to_string(),
            end_param: "endDate".to_string(),
            range,
        }
    }
}

/// Everything needed to fetch and reshape one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    /// Resource name, used in logs and errors
    pub name: String,
    /// Endpoint path relative to the API root
    pub path: String,
    /// Static query parameters sent on every page
    pub params: Vec<(String, String)>,
    /// Pagination mode
    pub pagination: Pagination,
    /// Offset of the first page
    pub start_skip: u64,
    /// Date window, for date-filtered endpoints
    pub dates: Option<DateParams>,
    /// Nested list explosion, applied page by page
    pub flatten: Option<FlattenSpec>,
    /// Flatten nested objects into dotted columns
    pub normalize: bool,
    /// Column renames applied after normalisation
    pub renames: Vec<(String, String)>,
    /// Drop later records on the same page repeating this field's value
    pub dedupe_by: Option<String>,
}

impl ResourceQuery {
    /// Create a query with no parameters or reshaping
    pub fn new(name: impl Into<String>, path: impl Into<String>, pagination: Pagination) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            params: Vec::new(),
            pagination,
            start_skip: 0,
            dates: None,
            flatten: None,
            normalize: false,
            renames: Vec::new(),
            dedupe_by: None,
        }
    }

    /// Add a static query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Start paginating at `skip`
    #[must_use]
    pub fn starting_at(mut self, skip: u64) -> Self {
        self.start_skip = skip;
        self
    }

    /// Override the requested page size, when the endpoint takes one
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        if let Pagination::Skip(paginator) = &mut self.pagination {
            *paginator = paginator.clone().with_page_size(page_size);
        }
        self
    }

    /// Filter by a date window
    #[must_use]
    pub fn with_dates(mut self, encoding: DateEncoding, range: DateRange) -> Self {
        self.dates = Some(DateParams::new(encoding, range));
        self
    }

    /// Explode a nested list
    #[must_use]
    pub fn flatten_with(mut self, spec: FlattenSpec) -> Self {
        self.flatten = Some(spec);
        self
    }

    /// Normalise nested objects into dotted columns
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize = true;
        self
    }

    /// Rename a column
    #[must_use]
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.push((from.into(), to.into()));
        self
    }

    /// Keep only the first record for each value of `field` within a page
    #[must_use]
    pub fn dedupe_by(mut self, field: impl Into<String>) -> Self {
        self.dedupe_by = Some(field.into());
        self
    }

    /// Static parameters plus the encoded date window
    pub fn base_params(&self) -> Result<Vec<(String, String)>> {
        let mut params = self.params.clone();
        if let Some(dates) = &self.dates {
            let (start, end) = dates.range.encode(&dates.encoding)?;
            params.push((dates.start_param.clone(), start));
            params.push((dates.end_param.clone(), end));
        }
        Ok(params)
    }

    /// Drop repeats of the dedupe field within one page's records.
    ///
    /// Each page is deduplicated on its own; a value repeated on a later
    /// page is kept. Records without the field are always kept.
    pub fn dedupe_page(&self, records: &mut Vec<Value>) {
        if let Some(field) = &self.dedupe_by {
            let mut seen = HashSet::new();
            records.retain(|record| match record.get(field) {
                Some(value) => seen.insert(value.to_string()),
                None => true,
            });
        }
    }

    /// Apply normalisation and renames to accumulated records
    pub fn shape(&self, records: Vec<Value>) -> Vec<Value> {
        let mut records = if self.normalize {
            normalize_all(records)
        } else {
            records
        };

        if !self.renames.is_empty() {
            for record in &mut records {
                if let Value::Object(map) = record {
                    for (from, to) in &self.renames {
                        if let Some(value) = map.remove(from) {
                            map.insert(to.clone(), value);
                        }
                    }
                }
            }
        }

        records
    }
}
