//! Tests for the auth module

use super::*;
use crate::error::Error;

#[test]
fn test_credentials_new() {
    let creds = Credentials::new("pk-123", "tok-456").unwrap();
    assert_eq!(creds.partner_key(), "pk-123");
    assert_eq!(creds.authorization(), "tok-456");
}

#[test]
fn test_credentials_reject_blank_partner_key() {
    let err = Credentials::new("  ", "tok").unwrap_err();
    assert!(matches!(err, Error::AuthMissing { field } if field == "partner_key"));
}

#[test]
fn test_credentials_reject_blank_authorization() {
    let err = Credentials::new("pk", "").unwrap_err();
    assert!(matches!(err, Error::AuthMissing { field } if field == "authorization"));
}

#[test]
fn test_credentials_from_parts_missing() {
    let err = Credentials::from_parts(None, Some("tok".to_string())).unwrap_err();
    assert!(matches!(err, Error::AuthMissing { .. }));

    let err = Credentials::from_parts(Some("pk".to_string()), None).unwrap_err();
    assert!(matches!(err, Error::AuthMissing { field } if field == "authorization"));
}

#[test]
fn test_credentials_debug_redacted() {
    let creds = Credentials::new("secret-key", "secret-token").unwrap();
    let debug = format!("{creds:?}");
    assert!(!debug.contains("secret-key"));
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_header_names_default() {
    let names = HeaderNames::default();
    assert_eq!(names.partner_key, "partner_key");
    assert_eq!(names.authorization, "Authorization");
}

#[test]
fn test_authenticator_applies_both_headers() {
    let auth = Authenticator::new(Credentials::new("pk-1", "tok-1").unwrap());
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert_eq!(built.headers().get("partner_key").unwrap(), "pk-1");
    assert_eq!(built.headers().get("Authorization").unwrap(), "tok-1");
}

#[test]
fn test_authenticator_custom_header_names() {
    let names = HeaderNames {
        partner_key: "X-Partner".to_string(),
        authorization: "X-Token".to_string(),
    };
    let auth = Authenticator::with_headers(Credentials::new("pk", "tok").unwrap(), names);
    let built = auth
        .apply(reqwest::Client::new().get("https://example.com"))
        .build()
        .unwrap();

    assert_eq!(built.headers().get("X-Partner").unwrap(), "pk");
    assert_eq!(built.headers().get("X-Token").unwrap(), "tok");
    assert!(built.headers().get("partner_key").is_none());
}
