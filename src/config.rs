//! Client configuration
//!
//! `ClientConfig` gathers everything a `BlazeClient` needs: where the API
//! lives, how to authenticate, and how far a single fetch may go. It can be
//! built in code, loaded from YAML, or filled from environment variables.
//! Fetch methods never read the environment themselves.

use crate::auth::{Credentials, HeaderNames};
use crate::engine::FetchLimits;
use crate::error::{Error, Result};
use crate::http::{RateLimiterConfig, SessionConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variables holding the partner key, in lookup order
pub const PARTNER_KEY_VARS: [&str; 2] = ["BLAZE_PARTNER_KEY", "blz_partner_key"];

/// Environment variables holding the authorization token, in lookup order
pub const API_KEY_VARS: [&str; 2] = ["BLAZE_API_KEY", "blz_api_key"];

/// Environment variable overriding the API root
pub const BASE_URL_VAR: &str = "BLAZE_BASE_URL";

// ============================================================================
// ClientConfig
// ============================================================================

/// Configuration for a `BlazeClient`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root all endpoint paths are joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Partner key credential
    #[serde(default)]
    pub partner_key: Option<String>,

    /// Authorization token credential
    #[serde(default)]
    pub authorization: Option<String>,

    /// Names of the credential headers
    #[serde(default)]
    pub header_names: HeaderNames,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Page cap for a single fetch
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Wall-clock budget for a single fetch, in seconds
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

fn default_max_pages() -> u32 {
    FetchLimits::default().max_pages
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            partner_key: None,
            authorization: None,
            header_names: HeaderNames::default(),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(),
            max_pages: default_max_pages(),
            deadline_secs: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("partner_key", &redact(&self.partner_key))
            .field("authorization", &redact(&self.authorization))
            .field("header_names", &self.header_names)
            .field("timeout_secs", &self.timeout_secs)
            .field("rate_limit", &self.rate_limit)
            .field("max_pages", &self.max_pages)
            .field("deadline_secs", &self.deadline_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Create a default config with no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Default config with values taken from the process environment
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Override fields from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override fields from any variable lookup.
    ///
    /// Empty values are ignored so a blank variable cannot erase a credential
    /// set elsewhere.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|key| lookup(key))
                .find(|value| !value.trim().is_empty())
        };

        if let Some(key) = first(&PARTNER_KEY_VARS[..]) {
            self.partner_key = Some(key);
        }
        if let Some(token) = first(&API_KEY_VARS[..]) {
            self.authorization = Some(token);
        }
        if let Some(url) = first(&[BASE_URL_VAR][..]) {
            self.base_url = url;
        }
        self
    }

    // ------------------------------------------------------------------------
    // Builder methods
    // ------------------------------------------------------------------------

    /// Set the API root
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set both credentials
    #[must_use]
    pub fn credentials(mut self, partner_key: impl Into<String>, authorization: impl Into<String>) -> Self {
        self.partner_key = Some(partner_key.into());
        self.authorization = Some(authorization.into());
        self
    }

    /// Set the credential header names
    #[must_use]
    pub fn header_names(mut self, names: HeaderNames) -> Self {
        self.header_names = names;
        self
    }

    /// Set the per-request timeout, rounded up to whole seconds
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = secs_rounded_up(timeout);
        self
    }

    /// Set the rate limit
    #[must_use]
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    #[must_use]
    pub fn no_rate_limit(mut self) -> Self {
        self.rate_limit = None;
        self
    }

    /// Set the page cap
    #[must_use]
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the fetch deadline, rounded up to whole seconds
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline_secs = Some(secs_rounded_up(deadline));
        self
    }

    // ------------------------------------------------------------------------
    // Derived settings
    // ------------------------------------------------------------------------

    /// Check values that would only fail later, at request time
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if self.max_pages == 0 {
            return Err(Error::config("max_pages must be greater than zero"));
        }
        if self.deadline_secs == Some(0) {
            return Err(Error::config("deadline_secs must be greater than zero"));
        }
        if let Some(rate) = &self.rate_limit {
            if rate.requests_per_second == 0 {
                return Err(Error::config(
                    "rate_limit.requests_per_second must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    /// Validated credentials
    pub fn to_credentials(&self) -> Result<Credentials> {
        Credentials::from_parts(self.partner_key.clone(), self.authorization.clone())
    }

    /// HTTP session settings
    pub fn session_config(&self) -> SessionConfig {
        let builder = SessionConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .header_names(self.header_names.clone());

        match &self.rate_limit {
            Some(rate) => builder.rate_limit(rate.clone()),
            None => builder.no_rate_limit(),
        }
        .build()
    }

    /// Guards for each fetch
    pub fn fetch_limits(&self) -> FetchLimits {
        let limits = FetchLimits::new().with_max_pages(self.max_pages);
        match self.deadline_secs {
            Some(secs) => limits.with_deadline(Duration::from_secs(secs)),
            None => limits,
        }
    }
}

/// Seconds in `duration`, counting any fraction as a full second
fn secs_rounded_up(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::default()));
        assert_eq!(config.max_pages, 10_000);
        assert!(config.deadline_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_full() {
        let yaml = r"
base_url: https://sandbox.example.com/partner
partner_key: pk-1
authorization: tok-1
header_names:
  partner_key: X-Partner-Key
timeout_secs: 10
rate_limit:
  requests_per_second: 2
  burst_size: 4
max_pages: 50
deadline_secs: 300
";
        let config = ClientConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "https://sandbox.example.com/partner");
        assert_eq!(config.header_names.partner_key, "X-Partner-Key");
        assert_eq!(config.header_names.authorization, "Authorization");
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));

        let limits = config.fetch_limits();
        assert_eq!(limits.max_pages, 50);
        assert_eq!(limits.deadline, Some(Duration::from_secs(300)));

        let session = config.session_config();
        assert_eq!(session.timeout, Duration::from_secs(10));
        assert_eq!(session.header_names.partner_key, "X-Partner-Key");

        let creds = config.to_credentials().unwrap();
        assert_eq!(creds.partner_key(), "pk-1");
        assert_eq!(creds.authorization(), "tok-1");
    }

    #[test]
    fn test_yaml_defaults_and_disabled_rate_limit() {
        let config = ClientConfig::from_yaml_str("rate_limit: null\n").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.rate_limit.is_none());
        assert!(config.session_config().rate_limit.is_none());
    }

    #[test]
    fn test_yaml_invalid_values() {
        assert!(matches!(
            ClientConfig::from_yaml_str("max_pages: 0\n"),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            ClientConfig::from_yaml_str("base_url: not a url\n"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            ClientConfig::from_yaml_str("timeout_secs: [1]\n"),
            Err(Error::YamlParse(_))
        ));
    }

    #[test]
    fn test_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "partner_key: from-file").unwrap();
        let config = ClientConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.partner_key.as_deref(), Some("from-file"));

        let err = ClientConfig::from_yaml_file("/nonexistent/blaze.yaml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_env_overrides_preferred_names() {
        let config = ClientConfig::new().with_overrides_from(env(&[
            ("BLAZE_PARTNER_KEY", "pk-new"),
            ("blz_partner_key", "pk-legacy"),
            ("BLAZE_API_KEY", "tok-new"),
        ]));
        assert_eq!(config.partner_key.as_deref(), Some("pk-new"));
        assert_eq!(config.authorization.as_deref(), Some("tok-new"));
    }

    #[test]
    fn test_env_overrides_legacy_names() {
        let config = ClientConfig::new().with_overrides_from(env(&[
            ("blz_partner_key", "pk-legacy"),
            ("blz_api_key", "tok-legacy"),
            ("BLAZE_BASE_URL", "http://localhost:8080"),
        ]));
        assert_eq!(config.partner_key.as_deref(), Some("pk-legacy"));
        assert_eq!(config.authorization.as_deref(), Some("tok-legacy"));
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_env_blank_values_ignored() {
        let config = ClientConfig::new()
            .credentials("pk-file", "tok-file")
            .with_overrides_from(env(&[("BLAZE_PARTNER_KEY", "  "), ("blz_partner_key", "")]));
        assert_eq!(config.partner_key.as_deref(), Some("pk-file"));
    }

    #[test]
    fn test_missing_credentials() {
        let err = ClientConfig::new().to_credentials().unwrap_err();
        assert!(matches!(err, Error::AuthMissing { field } if field == "partner_key"));

        let mut config = ClientConfig::new();
        config.partner_key = Some("pk".to_string());
        let err = config.to_credentials().unwrap_err();
        assert!(matches!(err, Error::AuthMissing { field } if field == "authorization"));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = ClientConfig::new().credentials("secret-pk", "secret-tok");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-pk"));
        assert!(!debug.contains("secret-tok"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .base_url("http://127.0.0.1:9000")
            .timeout(Duration::from_secs(5))
            .no_rate_limit()
            .max_pages(3)
            .deadline(Duration::from_secs(60));
        assert_eq!(config.timeout_secs, 5);
        assert!(config.rate_limit.is_none());
        assert_eq!(
            config.fetch_limits(),
            FetchLimits::new()
                .with_max_pages(3)
                .with_deadline(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_sub_second_durations_round_up() {
        let config = ClientConfig::new()
            .timeout(Duration::from_millis(1500))
            .deadline(Duration::from_millis(500));
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.deadline_secs, Some(1));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.fetch_limits().deadline,
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let err = ClientConfig::from_yaml_str("deadline_secs: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config { message } if message.contains("deadline_secs")));
    }
}
