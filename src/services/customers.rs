//! Customer operations.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::paths;
use crate::config::TimeoutPolicy;
use crate::errors::BankResult;
use crate::fallback::FallbackSource;
use crate::resilience::{FallbackHandler, Operation, OperationDescriptor, RequestExecutor};
use crate::types::{CustomerId, LoginRequest};

/// Registration, authentication and customer lookups.
pub struct CustomerService {
    executor: Arc<RequestExecutor>,
    timeouts: TimeoutPolicy,
    fallback: Option<Arc<dyn FallbackSource>>,
}

impl CustomerService {
    /// Creates a new customer service.
    pub fn new(
        executor: Arc<RequestExecutor>,
        timeouts: TimeoutPolicy,
        fallback: Option<Arc<dyn FallbackSource>>,
    ) -> Self {
        Self {
            executor,
            timeouts,
            fallback,
        }
    }

    /// Registers a new customer. Never retried.
    #[instrument(skip(self, customer))]
    pub async fn register<T>(&self, customer: &T) -> BankResult<Value>
    where
        T: Serialize + ?Sized,
    {
        let descriptor =
            OperationDescriptor::post(Operation::Register, paths::register(), &self.timeouts)
                .with_payload(serde_json::to_value(customer)?);
        self.executor.execute(descriptor).await
    }

    /// Authenticates a customer. Never retried.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> BankResult<Value> {
        let body = LoginRequest::new(username, password);
        let descriptor = OperationDescriptor::post(Operation::Login, paths::login(), &self.timeouts)
            .with_payload(serde_json::to_value(&body)?);
        self.executor.execute(descriptor).await
    }

    /// Fetches a customer by ID.
    #[instrument(skip(self))]
    pub async fn get_customer_by_id(&self, customer_id: CustomerId) -> BankResult<Value> {
        let descriptor = OperationDescriptor::get(
            Operation::GetCustomerById,
            paths::customer(customer_id),
            &self.timeouts,
        );
        self.executor.execute(descriptor).await
    }

    /// Fetches a customer by username, retrying once on timeout.
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> BankResult<Value> {
        let descriptor = OperationDescriptor::get(
            Operation::GetByUsername,
            paths::customer_by_username(username),
            &self.timeouts,
        );
        self.executor.execute(descriptor).await
    }

    /// Fetches a customer's balance.
    ///
    /// Retries once on timeout and then, like a connectivity failure, defers to
    /// the fallback source when one is configured.
    #[instrument(skip(self))]
    pub async fn get_balance(&self, customer_id: CustomerId) -> BankResult<Value> {
        let mut descriptor = OperationDescriptor::get(
            Operation::GetBalance,
            paths::balance(customer_id),
            &self.timeouts,
        );
        if let Some(source) = &self.fallback {
            let source = Arc::clone(source);
            descriptor = descriptor.with_fallback(FallbackHandler::new(move || async move {
                source.balance(customer_id).await
            }));
        }
        self.executor.execute(descriptor).await
    }
}

impl std::fmt::Debug for CustomerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomerService")
            .field("timeouts", &self.timeouts)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BankConfig;
    use crate::mocks::{MockFallback, MockResponse, MockTransport, RecordingObserver};
    use crate::transport::{HttpMethod, TransportError};
    use serde_json::json;
    use std::time::Duration;

    fn service(
        transport: &Arc<MockTransport>,
        fallback: Option<Arc<MockFallback>>,
    ) -> CustomerService {
        let config = BankConfig::builder().base_url("http://bank.test").build().unwrap();
        let executor = Arc::new(RequestExecutor::new(
            transport.clone(),
            Arc::new(RecordingObserver::new()),
            &config,
        ));
        CustomerService::new(
            executor,
            config.timeouts,
            fallback.map(|f| f as Arc<dyn FallbackSource>),
        )
    }

    fn timeout() -> TransportError {
        TransportError::Timeout {
            timeout: Duration::from_secs(10),
        }
    }

    #[tokio::test]
    async fn test_register_posts_customer_data() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&json!({"id": 1})));

        let customer = json!({"username": "alice", "fullName": "Alice Doe"});
        let payload = service(&transport, None).register(&customer).await.unwrap();

        assert_eq!(payload, json!({"id": 1}));
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/api/customers/register");
        assert_eq!(serde_json::from_slice::<Value>(&request.body.unwrap()).unwrap(), customer);
    }

    #[tokio::test]
    async fn test_login_surfaces_backend_body_without_retry() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::status_json(401, &json!({"error": "invalid credentials"})));

        let error = service(&transport, None).login("alice", "wrong").await.unwrap_err();

        assert_eq!(
            error.body().as_structured(),
            Some(&json!({"error": "invalid credentials"}))
        );
        assert_eq!(transport.request_count(), 1);
        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/api/customer/login");
        assert_eq!(
            serde_json::from_slice::<Value>(&request.body.unwrap()).unwrap(),
            json!({"username": "alice", "password": "wrong"})
        );
    }

    #[tokio::test]
    async fn test_login_timeout_is_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_failure(timeout());

        let error = service(&transport, None).login("alice", "pw").await.unwrap_err();

        assert!(error.is_timeout());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_get_by_username_retries_on_timeout() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_failure(timeout());
        transport.queue(MockResponse::json(&json!({"id": 5, "username": "bob"})));

        let payload = service(&transport, None).get_by_username("bob").await.unwrap();

        assert_eq!(payload["id"], 5);
        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].path, "/api/customers/username/bob");
        assert_eq!(requests[1].timeout, Some(Duration::from_secs(15)));
    }

    #[tokio::test]
    async fn test_get_by_username_connectivity_failure_has_no_fallback() {
        let transport = Arc::new(MockTransport::new());
        let fallback = Arc::new(MockFallback::new());
        transport.queue_failure(TransportError::Connection {
            message: "refused".to_string(),
        });

        let error = service(&transport, Some(fallback.clone()))
            .get_by_username("bob")
            .await
            .unwrap_err();

        assert!(error.is_connectivity());
        assert_eq!(transport.request_count(), 1);
        assert!(fallback.balance_calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_balance_double_timeout_uses_fallback() {
        let transport = Arc::new(MockTransport::new());
        let fallback = Arc::new(MockFallback::new().with_balance(json!({"balance": 900.0})));
        transport.queue_failure(timeout());
        transport.queue_failure(timeout());

        let payload = service(&transport, Some(fallback.clone()))
            .get_balance(42)
            .await
            .unwrap();

        assert_eq!(payload, json!({"balance": 900.0}));
        assert_eq!(fallback.balance_calls(), vec![42]);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_get_balance_without_fallback_source_surfaces_error() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_failure(timeout());
        transport.queue_failure(timeout());

        let error = service(&transport, None).get_balance(42).await.unwrap_err();

        assert!(error.is_timeout());
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_get_customer_by_id() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::status_json(404, &json!({"message": "Customer not found"})));

        let error = service(&transport, None).get_customer_by_id(8).await.unwrap_err();

        assert_eq!(error.status(), Some(404));
        assert_eq!(transport.last_request().unwrap().path, "/api/customers/8");
    }
}
