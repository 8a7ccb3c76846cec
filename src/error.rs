//! Error types for the BLAZE partner client
//!
//! Every public API returns `Result<T, Error>`. A fetch either yields the
//! complete record set or one of these errors, never partial data.

use thiserror::Error;

/// The main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Setup: config, credentials, arguments
    // ============================================================================
    #[error("Missing credential: {field}")]
    AuthMissing { field: String },

    #[error("Invalid client configuration: {message}")]
    Config { message: String },

    #[error("Unknown resource: {name}")]
    UnknownResource { name: String },

    #[error("Invalid date '{value}': {message}")]
    InvalidDate { value: String, message: String },

    #[error("Config file is not valid YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON (de)serialisation failed: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Bad base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport
    // ============================================================================
    #[error("Request to the partner API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from '{endpoint}': {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    // ============================================================================
    // Paging
    // ============================================================================
    #[error("Malformed envelope from '{endpoint}': {message}")]
    MalformedEnvelope { endpoint: String, message: String },

    #[error("Page limit ({max_pages}) reached for '{endpoint}' before total was exhausted")]
    PageLimitExceeded { endpoint: String, max_pages: u32 },

    #[error("Deadline exceeded for '{endpoint}' after {elapsed_ms}ms")]
    DeadlineExceeded { endpoint: String, elapsed_ms: u64 },

    // ============================================================================
    // Reshaping and output
    // ============================================================================
    #[error("Inventory not found: {name}")]
    InventoryNotFound { name: String },

    #[error("Flatten error: {message}")]
    Flatten { message: String },

    #[error("Could not build table: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Could not write Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Could not write output: {message}")]
    Output { message: String },

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Invalid or inconsistent configuration
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// A required credential is absent or blank
    pub fn auth_missing(field: impl Into<String>) -> Self {
        Self::AuthMissing {
            field: field.into(),
        }
    }

    /// A non-2xx response from `endpoint`
    pub fn http_status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// A response body that is not a usable page envelope
    pub fn malformed(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// No inventory carries this name
    pub fn inventory_not_found(name: impl Into<String>) -> Self {
        Self::InventoryNotFound { name: name.into() }
    }

    /// Line item explosion failed
    pub fn flatten(message: impl Into<String>) -> Self {
        Self::Flatten {
            message: message.into(),
        }
    }

    /// A date argument that cannot be parsed or encoded
    pub fn invalid_date(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Writing a table failed
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::HttpStatus { status, .. } => transient_status(*status),
            _ => false,
        }
    }
}

/// Throttling and gateway failures
fn transient_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502..=504)
}

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_endpoint() {
        let err = Error::auth_missing("partner_key");
        assert_eq!(err.to_string(), "Missing credential: partner_key");

        let err = Error::http_status("products", 500, "boom");
        assert_eq!(err.to_string(), "HTTP 500 from 'products': boom");

        let err = Error::inventory_not_found("Back Room");
        assert_eq!(err.to_string(), "Inventory not found: Back Room");

        let err = Error::malformed("vendors", "missing key 'total'");
        assert_eq!(
            err.to_string(),
            "Malformed envelope from 'vendors': missing key 'total'"
        );
    }

    #[test]
    fn test_only_transient_failures_are_retryable() {
        assert!(Error::http_status("x", 429, "").is_retryable());
        assert!(Error::http_status("x", 503, "").is_retryable());

        assert!(!Error::http_status("x", 401, "").is_retryable());
        assert!(!Error::http_status("x", 404, "").is_retryable());
        assert!(!Error::inventory_not_found("Safe").is_retryable());
        assert!(!Error::http_status("x", 501, "").is_retryable());
        assert!(!Error::malformed("x", "bad").is_retryable());
    }
}
