//! Integration tests for transaction operations

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_deposit_posts_camel_case_body() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/transactions/deposit"))
        .and(body_json(json!({"customerId": 7, "amount": 50.0, "description": "cash"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"transactionId": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let payload = client(&mock_server.uri())
        .transactions()
        .deposit(7, 50.0, "cash")
        .await
        .unwrap();

    assert_eq!(payload, json!({"transactionId": 1}));
}

#[tokio::test]
async fn test_withdraw_timeout_is_not_retried() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/api/transactions/withdraw"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"transactionId": 2}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&mock_server)
        .await;

    let error = client(&mock_server.uri())
        .transactions()
        .withdraw(7, 10.0, "atm")
        .await
        .unwrap_err();

    assert!(error.is_timeout());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_retry_uses_transfer_tier() {
    let mock_server = setup_mock_server().await;
    let body = json!({"fromCustomerId": 1, "toCustomerId": 2, "amount": 100.0, "description": "rent"});

    // Both attempts outlast the extended tier; only the transfer tier fits the second.
    Mock::given(method("POST"))
        .and(path("/api/transactions/transfer"))
        .and(body_json(body.clone()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"attempt": 1}))
                .set_delay(Duration::from_millis(800)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/transactions/transfer"))
        .and(body_json(body))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"attempt": 2}))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&mock_server)
        .await;

    let payload = client(&mock_server.uri())
        .transactions()
        .transfer(1, 2, 100.0, "rent")
        .await
        .unwrap();

    assert_eq!(payload, json!({"attempt": 2}));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_transfer_connectivity_failure_fails_immediately() {
    let mut fallback = MockFallback::new();
    fallback.expect_balance().never();
    fallback.expect_transactions().never();

    let error = client_with_fallback(UNREACHABLE_URL, Arc::new(fallback))
        .transactions()
        .transfer(1, 2, 100.0, "rent")
        .await
        .unwrap_err();

    assert!(error.is_connectivity());
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn test_get_transactions_connectivity_failure_falls_back_once() {
    let mut fallback = MockFallback::new();
    fallback
        .expect_transactions()
        .withf(|customer_id| *customer_id == 42)
        .times(1)
        .returning(|_| Ok(json!([{"id": 5, "amount": 20.0}])));
    fallback.expect_balance().never();

    let payload = client_with_fallback(UNREACHABLE_URL, Arc::new(fallback))
        .transactions()
        .get_transactions(42)
        .await
        .unwrap();

    assert_eq!(payload, json!([{"id": 5, "amount": 20.0}]));
}

#[tokio::test]
async fn test_history_endpoints_pass_payload_through() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/api/transactions/customer/3/passbook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transactions/debug/customer/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/transactions/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server.uri());

    assert_eq!(client.transactions().get_passbook(3).await.unwrap(), json!({"entries": []}));
    assert_eq!(client.transactions().debug_transactions(3).await.unwrap(), json!({"count": 0}));
    assert_eq!(client.transactions().get_transaction(9).await.unwrap(), json!({"id": 9}));
}
