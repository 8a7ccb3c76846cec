//! Common types used throughout the client
//!
//! Type aliases for JSON records plus the date handling shared by every
//! date-windowed resource.

use crate::error::{Error, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Default calendar format used by the partner API (`MM/DD/YYYY`)
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

// ============================================================================
// Date Encoding
// ============================================================================

/// How an endpoint expects date-range parameters to be encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DateEncoding {
    /// Calendar date rendered with a chrono format string
    Formatted {
        /// strftime-style format
        format: String,
    },
    /// Integer milliseconds since the Unix epoch, at midnight UTC
    EpochMillis,
}

impl Default for DateEncoding {
    fn default() -> Self {
        Self::Formatted {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl DateEncoding {
    /// Encode a single date as a query parameter value
    pub fn encode(&self, date: NaiveDate) -> Result<String> {
        match self {
            DateEncoding::Formatted { format } => {
                let mut encoded = String::new();
                write!(encoded, "{}", date.format(format)).map_err(|_| {
                    Error::invalid_date(date.to_string(), format!("bad date format '{format}'"))
                })?;
                Ok(encoded)
            }
            DateEncoding::EpochMillis => date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis().to_string())
                .ok_or_else(|| Error::invalid_date(date.to_string(), "no midnight for date")),
        }
    }
}

// ============================================================================
// Date Range
// ============================================================================

/// Inclusive calendar window for date-filtered resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the window
    pub start: NaiveDate,
    /// Last day of the window
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a new range, rejecting windows that end before they start
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::invalid_date(
                end.to_string(),
                format!("end date precedes start date {start}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Yesterday through today, in local time
    pub fn last_day() -> Self {
        let today = Local::now().date_naive();
        Self {
            start: today - Duration::days(1),
            end: today,
        }
    }

    /// Encode both ends of the range
    pub fn encode(&self, encoding: &DateEncoding) -> Result<(String, String)> {
        Ok((encoding.encode(self.start)?, encoding.encode(self.end)?))
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::last_day()
    }
}

/// Parse a calendar date given as `YYYY-MM-DD` or `MM/DD/YYYY`
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, DEFAULT_DATE_FORMAT))
        .map_err(|e| Error::invalid_date(value, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_formatted_encoding_default() {
        let encoded = DateEncoding::default().encode(date(2023, 3, 7)).unwrap();
        assert_eq!(encoded, "03/07/2023");
    }

    #[test]
    fn test_formatted_encoding_custom() {
        let encoding = DateEncoding::Formatted {
            format: "%Y-%m-%d".to_string(),
        };
        assert_eq!(encoding.encode(date(2023, 3, 7)).unwrap(), "2023-03-07");
    }

    #[test]
    fn test_formatted_encoding_bad_format_is_error() {
        let encoding = DateEncoding::Formatted {
            format: "%Q".to_string(),
        };
        let err = encoding.encode(date(2023, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { message, .. } if message.contains("%Q")));
    }

    #[test]
    fn test_epoch_millis_encoding() {
        let encoded = DateEncoding::EpochMillis.encode(date(2023, 1, 1)).unwrap();
        assert_eq!(encoded, "1672531200000");

        let epoch = DateEncoding::EpochMillis.encode(date(1970, 1, 1)).unwrap();
        assert_eq!(epoch, "0");
    }

    #[test]
    fn test_date_range_rejects_inverted() {
        assert!(DateRange::new(date(2023, 1, 2), date(2023, 1, 1)).is_err());
        assert!(DateRange::new(date(2023, 1, 1), date(2023, 1, 1)).is_ok());
    }

    #[test]
    fn test_date_range_last_day() {
        let range = DateRange::last_day();
        assert_eq!(range.end - range.start, Duration::days(1));
    }

    #[test]
    fn test_date_range_encode() {
        let range = DateRange::new(date(2023, 1, 1), date(2023, 1, 2)).unwrap();
        let (start, end) = range.encode(&DateEncoding::EpochMillis).unwrap();
        assert_eq!(start, "1672531200000");
        assert_eq!(end, "1672617600000");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-03-07").unwrap(), date(2023, 3, 7));
        assert_eq!(parse_date("03/07/2023").unwrap(), date(2023, 3, 7));
        assert!(matches!(
            parse_date("yesterday"),
            Err(Error::InvalidDate { .. })
        ));
    }
}
