//! Client-side request pacing for the partner API
//!
//! The partner API throttles aggressive callers, so every request made by a
//! [`Session`](super::Session) first takes a token from a `governor` bucket.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Requests per second allowed when nothing else is configured
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 5;

/// Bucket settings, as read from `rate_limit` in the client config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Sustained request rate
    pub requests_per_second: u32,
    /// Requests that may go out back to back before pacing starts
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_SECOND, DEFAULT_REQUESTS_PER_SECOND)
    }
}

impl RateLimiterConfig {
    /// Pace at `requests_per_second` after an initial burst of `burst_size`
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// The governor quota. Zero values are raised to one.
    fn quota(&self) -> Quota {
        let at_least_one = |n: u32| NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(at_least_one(self.requests_per_second))
            .allow_burst(at_least_one(self.burst_size))
    }
}

/// Shared token bucket; clones draw from the same bucket
#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    bucket: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// A full bucket with the given settings
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            bucket: Arc::new(Governor::direct(config.quota())),
            config: config.clone(),
        }
    }

    /// Settings this limiter was built from
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Sleep until a token is available, then take it
    pub async fn wait(&self) {
        self.bucket.until_ready().await;
    }

    /// Take a token if one is available right now
    pub fn try_acquire(&self) -> bool {
        self.bucket.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("requests_per_second", &self.config.requests_per_second)
            .field("burst_size", &self.config.burst_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pacing() {
        let config = RateLimiterConfig::default();
        assert_eq!(config, RateLimiterConfig::new(5, 5));
    }

    #[test]
    fn test_config_from_yaml() {
        let config: RateLimiterConfig =
            serde_yaml::from_str("requests_per_second: 2\nburst_size: 4\n").unwrap();
        assert_eq!(config, RateLimiterConfig::new(2, 4));
    }

    #[tokio::test]
    async fn test_burst_then_throttled() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 3));

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_clones_share_bucket() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(1, 1));
        let clone = limiter.clone();

        assert!(limiter.try_acquire());
        assert!(!clone.try_acquire());
    }

    #[tokio::test]
    async fn test_zero_settings_still_admit_a_request() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(0, 0));
        assert!(limiter.try_acquire());
        assert_eq!(limiter.config().requests_per_second, 0);
    }

    #[tokio::test]
    async fn test_wait_returns_when_token_free() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(50, 2));
        limiter.wait().await;
        limiter.wait().await;
    }

    #[test]
    fn test_debug_shows_settings() {
        let limiter = RateLimiter::new(&RateLimiterConfig::new(7, 3));
        let debug = format!("{limiter:?}");
        assert!(debug.contains("requests_per_second: 7"));
    }
}
