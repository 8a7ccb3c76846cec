//! Authenticated HTTP session
//!
//! Issues GET requests against the partner API with both credential headers
//! attached. Handles:
//! - Base URL joining
//! - Optional rate limiting
//! - Classification of non-2xx responses into `Error::HttpStatus`

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{Authenticator, Credentials, HeaderNames};
use crate::error::{Error, Result};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default partner API root
pub const DEFAULT_BASE_URL: &str = "https://api.partners.blaze.me/api/v1/partner";

/// Connection settings shared by every request of a [`Session`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL all endpoint paths are joined onto
    pub base_url: String,
    /// Per-request timeout, applied by reqwest
    pub timeout: Duration,
    /// Client-side pacing; `None` sends requests unthrottled
    pub rate_limit: Option<RateLimiterConfig>,
    /// Names of the credential headers
    pub header_names: HeaderNames,
    /// Sent as `User-Agent` on every request
    pub user_agent: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            rate_limit: Some(RateLimiterConfig::default()),
            header_names: HeaderNames::default(),
            user_agent: format!("blaze-partner/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl SessionConfig {
    /// Start from the defaults and override selectively
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Fluent construction of a [`SessionConfig`]
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// API root, e.g. a sandbox or a mock server
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Give up on any single request after `timeout`
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Pace requests with the given bucket
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Send requests as fast as the server answers
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Header names for a deployment that renames them
    pub fn header_names(mut self, names: HeaderNames) -> Self {
        self.config.header_names = names;
        self
    }

    /// Identify the caller with a custom `User-Agent`
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Finish with the settings given so far
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// Per-call query parameters and timeout override
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in the order they are sent
    pub query: Vec<(String, String)>,
    /// Replaces the session timeout for this call only
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    /// No parameters, session timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter, replacing an earlier one with the same name
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    /// Bound this call more tightly than the session does
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Look up a query parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Authenticated session against the partner API
pub struct Session {
    client: Client,
    config: SessionConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl Session {
    /// Create a session with the default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(SessionConfig::default(), credentials)
    }

    /// Create a session with custom configuration.
    ///
    /// Blank credentials or an unparseable base URL are rejected here; the
    /// session cannot be constructed in an unusable state.
    pub fn with_config(config: SessionConfig, credentials: Credentials) -> Result<Self> {
        credentials.validate()?;
        Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        let authenticator = Authenticator::with_headers(credentials, config.header_names.clone());

        Ok(Self {
            client,
            config,
            authenticator,
            rate_limiter,
        })
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Make an authenticated GET request.
    ///
    /// Any non-2xx status is returned as `Error::HttpStatus` naming `endpoint`.
    pub async fn get(&self, endpoint: &str, config: RequestConfig) -> Result<Response> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let url = self.build_url(endpoint);
        let mut request = self.authenticator.apply(self.client.get(&url));
        if !config.query.is_empty() {
            request = request.query(&config.query);
        }
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(endpoint, status.as_u16(), body));
        }

        debug!(url = %url, status = status.as_u16(), "partner API response");
        Ok(response)
    }

    /// Make an authenticated GET request and parse the body as JSON
    pub async fn get_json(&self, endpoint: &str, config: RequestConfig) -> Result<Value> {
        let response = self.get(endpoint, config).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| Error::malformed(endpoint, format!("response is not JSON: {e}")))
    }

    /// Whether requests go through a rate limiter
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Join an endpoint path onto the API root. Absolute URLs pass through.
    fn build_url(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}
