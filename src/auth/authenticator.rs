//! Authenticator implementation
//!
//! Applies the credential headers to request builders.

use super::types::{Credentials, HeaderNames};
use reqwest::RequestBuilder;

/// Stamps the credential pair onto every outgoing request
#[derive(Debug, Clone)]
pub struct Authenticator {
    credentials: Credentials,
    headers: HeaderNames,
}

impl Authenticator {
    /// Create an authenticator with the default header names
    pub fn new(credentials: Credentials) -> Self {
        Self::with_headers(credentials, HeaderNames::default())
    }

    /// Create an authenticator with custom header names
    pub fn with_headers(credentials: Credentials, headers: HeaderNames) -> Self {
        Self {
            credentials,
            headers,
        }
    }

    /// Apply both credential headers to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(
            self.headers.partner_key.as_str(),
            self.credentials.partner_key(),
        )
        .header(
            self.headers.authorization.as_str(),
            self.credentials.authorization(),
        )
    }

    /// Header names in use
    pub fn header_names(&self) -> &HeaderNames {
        &self.headers
    }
}
