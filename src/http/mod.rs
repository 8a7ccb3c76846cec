//! HTTP session module
//!
//! Provides the authenticated session every resource fetch goes through.
//!
//! # Features
//!
//! - **Credential headers**: both partner credentials on every request
//! - **Typed failures**: non-2xx responses become `Error::HttpStatus`
//! - **Rate Limiting**: optional token bucket rate limiter using governor
//!
//! There are no retries here; retry policy belongs to the caller.

mod client;
mod rate_limit;

pub use client::{RequestConfig, Session, SessionConfig, SessionConfigBuilder, DEFAULT_BASE_URL};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
