//! Credential types
//!
//! Both credential values are required; a blank value is a configuration
//! error raised at construction, never a request-time failure.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header name the partner key is sent under by default
pub const DEFAULT_PARTNER_KEY_HEADER: &str = "partner_key";

/// Header name the authorization token is sent under by default
pub const DEFAULT_AUTHORIZATION_HEADER: &str = "Authorization";

/// The partner key and authorization token required on every request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    partner_key: String,
    authorization: String,
}

impl Credentials {
    /// Create a credential pair, rejecting blank values
    pub fn new(partner_key: impl Into<String>, authorization: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            partner_key: partner_key.into(),
            authorization: authorization.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Build from optional values, as read from a config file or environment
    pub fn from_parts(partner_key: Option<String>, authorization: Option<String>) -> Result<Self> {
        let partner_key = partner_key.ok_or_else(|| Error::auth_missing("partner_key"))?;
        let authorization = authorization.ok_or_else(|| Error::auth_missing("authorization"))?;
        Self::new(partner_key, authorization)
    }

    /// Check that neither value is blank
    pub fn validate(&self) -> Result<()> {
        if self.partner_key.trim().is_empty() {
            return Err(Error::auth_missing("partner_key"));
        }
        if self.authorization.trim().is_empty() {
            return Err(Error::auth_missing("authorization"));
        }
        Ok(())
    }

    /// The partner key
    pub fn partner_key(&self) -> &str {
        &self.partner_key
    }

    /// The authorization token
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("partner_key", &"<redacted>")
            .field("authorization", &"<redacted>")
            .finish()
    }
}

/// Names of the two credential headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderNames {
    /// Header carrying the partner key
    #[serde(default = "default_partner_key_header")]
    pub partner_key: String,
    /// Header carrying the authorization token
    #[serde(default = "default_authorization_header")]
    pub authorization: String,
}

fn default_partner_key_header() -> String {
    DEFAULT_PARTNER_KEY_HEADER.to_string()
}

fn default_authorization_header() -> String {
    DEFAULT_AUTHORIZATION_HEADER.to_string()
}

impl Default for HeaderNames {
    fn default() -> Self {
        Self {
            partner_key: default_partner_key_header(),
            authorization: default_authorization_header(),
        }
    }
}
