//! Integration tests using WireMock
//!
//! These tests drive the client through the real reqwest transport against a
//! mock HTTP server, covering retries, fallbacks and error normalization.

mod customers;
mod fallback;
mod transactions;

use async_trait::async_trait;
use bank_client::{BankClient, BankResult, CustomerId, FallbackSource, TimeoutPolicy};
use mockall::mock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

mock! {
    pub Fallback {}

    #[async_trait]
    impl FallbackSource for Fallback {
        async fn balance(&self, customer_id: CustomerId) -> BankResult<Value>;
        async fn transactions(&self, customer_id: CustomerId) -> BankResult<Value>;
    }
}

/// Address nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Short timeout tiers so timeout tests finish quickly.
pub fn short_timeouts() -> TimeoutPolicy {
    TimeoutPolicy {
        base: Duration::from_millis(200),
        extended: Duration::from_millis(400),
        transfer: Duration::from_millis(1500),
    }
}

/// Helper to create a mock server
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at `base_url` with short timeouts.
pub fn client(base_url: &str) -> BankClient {
    BankClient::builder()
        .base_url(base_url)
        .timeouts(short_timeouts())
        .build()
        .expect("Failed to build client")
}

/// Client pointed at `base_url` with short timeouts and a fallback source.
pub fn client_with_fallback(base_url: &str, fallback: Arc<dyn FallbackSource>) -> BankClient {
    BankClient::builder()
        .base_url(base_url)
        .timeouts(short_timeouts())
        .fallback(fallback)
        .build()
        .expect("Failed to build client")
}
