//! Tests for the inventory module

use super::*;
use crate::auth::Credentials;
use crate::error::Error;
use crate::http::{Session, SessionConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_from_records() {
    let resolver = InventoryResolver::from_records(&[
        json!({"id": "inv-1", "name": "Safe", "active": true}),
        json!({"id": "inv-2", "name": "Back Room"}),
        json!({"id": 7, "name": "Numeric"}),
    ]);

    assert_eq!(resolver.len(), 3);
    assert_eq!(resolver.resolve("Safe").unwrap(), "inv-1");
    assert_eq!(resolver.resolve("Back Room").unwrap(), "inv-2");
    assert_eq!(resolver.resolve("Numeric").unwrap(), "7");
    assert_eq!(resolver.names(), vec!["Back Room", "Numeric", "Safe"]);
}

#[test]
fn test_from_records_skips_incomplete() {
    let resolver = InventoryResolver::from_records(&[
        json!({"id": "inv-1"}),
        json!({"name": "No Id"}),
        json!({"id": null, "name": "Null Id"}),
        json!("not an object"),
    ]);
    assert!(resolver.is_empty());
}

#[test]
fn test_from_records_first_name_wins() {
    let resolver = InventoryResolver::from_records(&[
        json!({"id": "first", "name": "Safe"}),
        json!({"id": "second", "name": "Safe"}),
    ]);
    assert_eq!(resolver.resolve("Safe").unwrap(), "first");
}

#[test]
fn test_resolve_unknown_name() {
    let resolver = InventoryResolver::from_records(&[json!({"id": "inv-1", "name": "Safe"})]);
    let err = resolver.resolve("safe").unwrap_err();
    assert!(matches!(err, Error::InventoryNotFound { name } if name == "safe"));
}

#[tokio::test]
async fn test_load_single_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/inventory/inventories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                {"id": "inv-1", "name": "Safe"},
                {"id": "inv-2", "name": "Shop Floor"}
            ],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    let session = Session::with_config(config, Credentials::new("pk", "tok").unwrap()).unwrap();

    let resolver = InventoryResolver::load(&session).await.unwrap();
    assert_eq!(resolver.resolve("Shop Floor").unwrap(), "inv-2");
}

#[tokio::test]
async fn test_load_propagates_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/store/inventory/inventories"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let config = SessionConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    let session = Session::with_config(config, Credentials::new("pk", "tok").unwrap()).unwrap();

    let err = InventoryResolver::load(&session).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
}
