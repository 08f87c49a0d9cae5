//! Integration tests for customer operations

use super::*;
use bank_client::{BankError, ErrorBody};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_register_returns_backend_payload() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/customers/register"))
        .and(body_json(json!({"username": "alice", "fullName": "Alice Doe"})))
        .and(header_exists("X-Request-Id"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 42, "username": "alice"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let payload = client(&mock_server.uri())
        .customers()
        .register(&json!({"username": "alice", "fullName": "Alice Doe"}))
        .await
        .unwrap();

    assert_eq!(payload, json!({"id": 42, "username": "alice"}));
}

#[tokio::test]
async fn test_login_unauthorized_surfaces_body_without_retry() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/customer/login"))
        .and(body_json(json!({"username": "alice", "password": "wrong"})))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid credentials"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = client(&mock_server.uri())
        .customers()
        .login("alice", "wrong")
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(401));
    assert_eq!(error.body(), ErrorBody::Structured(json!({"error": "invalid credentials"})));
}

#[test_case(400, true ; "bad request is a validation error")]
#[test_case(422, true ; "unprocessable entity is a validation error")]
#[test_case(404, false ; "not found is an api error")]
#[test_case(500, false ; "server error is an api error")]
#[tokio::test]
async fn test_status_codes_are_terminal(status: u16, validation: bool) {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/customers/username/bob"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({"message": "nope"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let error = client(&mock_server.uri())
        .customers()
        .get_by_username("bob")
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(status));
    assert_eq!(matches!(error, BankError::Validation { .. }), validation);
    assert_eq!(error.body(), ErrorBody::Structured(json!({"message": "nope"})));
}

#[tokio::test]
async fn test_plain_text_and_empty_error_bodies() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/customers/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal failure"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/customers/2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri());
    let text = client.customers().get_customer_by_id(1).await.unwrap_err();
    let empty = client.customers().get_customer_by_id(2).await.unwrap_err();

    assert_eq!(text.body(), ErrorBody::Message("Internal failure".to_string()));
    assert_eq!(
        empty.body(),
        ErrorBody::Message("Request failed with status code 503".to_string())
    );
}

#[tokio::test]
async fn test_get_by_username_retries_slow_first_attempt() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/customers/username/bob"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1}))
                .set_delay(Duration::from_millis(800)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/customers/username/bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
        .mount(&mock_server)
        .await;

    let payload = client(&mock_server.uri())
        .customers()
        .get_by_username("bob")
        .await
        .unwrap();

    assert_eq!(payload, json!({"id": 2}));
    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(
        received[0].headers.get("x-request-id"),
        received[1].headers.get("x-request-id")
    );
}

#[tokio::test]
async fn test_get_balance_times_out_twice_then_falls_back() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/customers/42/balance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"balance": 1.0}))
                .set_delay(Duration::from_millis(1200)),
        )
        .mount(&mock_server)
        .await;

    let mut fallback = MockFallback::new();
    fallback
        .expect_balance()
        .withf(|customer_id| *customer_id == 42)
        .times(1)
        .returning(|_| Ok(json!({"balance": 250.0, "stale": true})));
    fallback.expect_transactions().never();

    let payload = client_with_fallback(&mock_server.uri(), Arc::new(fallback))
        .customers()
        .get_balance(42)
        .await
        .unwrap();

    assert_eq!(payload, json!({"balance": 250.0, "stale": true}));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_balance_fallback_error_is_returned_unchanged() {
    let mut fallback = MockFallback::new();
    fallback
        .expect_balance()
        .times(1)
        .returning(|_| Err(BankError::fallback("replica offline")));

    let error = client_with_fallback(UNREACHABLE_URL, Arc::new(fallback))
        .customers()
        .get_balance(42)
        .await
        .unwrap_err();

    assert!(matches!(error, BankError::Fallback { ref message } if message == "replica offline"));
}
