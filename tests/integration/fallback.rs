//! Integration tests for the built-in fallback sources

use super::*;
use bank_client::{HttpFallbackSource, SnapshotFallback};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_http_mirror_answers_when_primary_is_unreachable() {
    let mirror = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/customers/42/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"balance": 99.5})))
        .expect(1)
        .mount(&mirror)
        .await;

    let source = HttpFallbackSource::new(mirror.uri()).unwrap();
    let payload = client_with_fallback(UNREACHABLE_URL, Arc::new(source))
        .customers()
        .get_balance(42)
        .await
        .unwrap();

    assert_eq!(payload, json!({"balance": 99.5}));
}

#[tokio::test]
async fn test_http_mirror_error_is_normalized() {
    let mirror = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/customer/42"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"error": "replica lagging"})))
        .expect(1)
        .mount(&mirror)
        .await;

    let source = HttpFallbackSource::new(mirror.uri()).unwrap();
    let error = client_with_fallback(UNREACHABLE_URL, Arc::new(source))
        .transactions()
        .get_transactions(42)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert_eq!(error.body().as_structured(), Some(&json!({"error": "replica lagging"})));
}

#[tokio::test]
async fn test_snapshot_answers_when_primary_is_unreachable() {
    let snapshot = SnapshotFallback::new().with_balance(42, json!({"balance": 10.0}));

    let payload = client_with_fallback(UNREACHABLE_URL, Arc::new(snapshot))
        .customers()
        .get_balance(42)
        .await
        .unwrap();

    assert_eq!(payload, json!({"balance": 10.0}));
}
