//! Mock implementations for testing.
//!
//! Provides a scripted transport, a recording fallback source and a
//! recording observer for unit testing without a live banking backend.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::{BankError, BankResult};
use crate::fallback::FallbackSource;
use crate::observability::{AttemptContext, ExecutionObserver};
use crate::resilience::FailureClass;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::CustomerId;

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Per-attempt timeout the request was sent with.
    pub timeout: Option<Duration>,
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
    /// Time the transport waits before answering.
    pub delay: Option<Duration>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self::status_json(200, value)
    }

    /// Creates a JSON response with a custom status.
    pub fn status_json<T: serde::Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status,
            headers,
            body,
            delay: None,
        }
    }

    /// Creates a plain text response.
    pub fn text(status: u16, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());

        Self {
            status,
            headers,
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    /// Delays the response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Response(MockResponse),
    Failure(TransportError),
}

/// Mock HTTP transport for testing.
///
/// Scripted outcomes are consumed in order; once the queue is empty the
/// default response is used.
pub struct MockTransport {
    outcomes: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        self.outcomes.lock().unwrap().push_back(Scripted::Response(response));
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        self.outcomes.lock().unwrap().push_back(Scripted::Failure(error));
    }

    /// Sets the default response.
    pub fn set_default(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn next_outcome(&self) -> Scripted {
        if let Some(outcome) = self.outcomes.lock().unwrap().pop_front() {
            return outcome;
        }
        let fallback = MockResponse::status_json(
            500,
            &serde_json::json!({"error": "No mock response configured"}),
        );
        Scripted::Response(self.default_response.lock().unwrap().clone().unwrap_or(fallback))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            path: request.path,
            headers: request.headers,
            body: request.body,
            timeout: request.timeout,
        });

        match self.next_outcome() {
            Scripted::Failure(error) => Err(error),
            Scripted::Response(response) => {
                if let Some(delay) = response.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse {
                    status: response.status,
                    headers: response.headers,
                    body: response.body,
                })
            }
        }
    }
}

/// Fallback source that records calls and answers with seeded payloads.
#[derive(Default)]
pub struct MockFallback {
    balance: Option<Value>,
    transactions: Option<Value>,
    balance_calls: Mutex<Vec<CustomerId>>,
    transaction_calls: Mutex<Vec<CustomerId>>,
}

impl MockFallback {
    /// Creates a fallback that fails every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the balance payload.
    pub fn with_balance(mut self, payload: Value) -> Self {
        self.balance = Some(payload);
        self
    }

    /// Seeds the transactions payload.
    pub fn with_transactions(mut self, payload: Value) -> Self {
        self.transactions = Some(payload);
        self
    }

    /// Customer IDs passed to `balance`, in call order.
    pub fn balance_calls(&self) -> Vec<CustomerId> {
        self.balance_calls.lock().unwrap().clone()
    }

    /// Customer IDs passed to `transactions`, in call order.
    pub fn transaction_calls(&self) -> Vec<CustomerId> {
        self.transaction_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FallbackSource for MockFallback {
    async fn balance(&self, customer_id: CustomerId) -> BankResult<Value> {
        self.balance_calls.lock().unwrap().push(customer_id);
        self.balance
            .clone()
            .ok_or_else(|| BankError::fallback("mock balance unavailable"))
    }

    async fn transactions(&self, customer_id: CustomerId) -> BankResult<Value> {
        self.transaction_calls.lock().unwrap().push(customer_id);
        self.transactions
            .clone()
            .ok_or_else(|| BankError::fallback("mock transactions unavailable"))
    }
}

/// Observer callback as recorded by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserverEvent {
    /// An attempt is about to be sent.
    AttemptStart {
        /// Attempt number.
        attempt: u32,
    },
    /// An attempt failed.
    AttemptFailure {
        /// Attempt number.
        attempt: u32,
        /// Classification of the failure.
        class: FailureClass,
    },
    /// A retry was scheduled.
    Retry {
        /// Attempt number of the retry.
        attempt: u32,
    },
    /// The fallback source was consulted.
    Fallback {
        /// Last primary attempt.
        attempt: u32,
    },
    /// An attempt succeeded.
    Success {
        /// Attempt number.
        attempt: u32,
    },
}

/// Observer that records every callback.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, in order.
    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: ObserverEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ExecutionObserver for RecordingObserver {
    fn on_attempt_start(&self, attempt: &AttemptContext) {
        self.record(ObserverEvent::AttemptStart {
            attempt: attempt.attempt,
        });
    }

    fn on_attempt_failure(&self, attempt: &AttemptContext, class: FailureClass, _error: &BankError) {
        self.record(ObserverEvent::AttemptFailure {
            attempt: attempt.attempt,
            class,
        });
    }

    fn on_retry(&self, attempt: &AttemptContext) {
        self.record(ObserverEvent::Retry {
            attempt: attempt.attempt,
        });
    }

    fn on_fallback(&self, last_attempt: &AttemptContext) {
        self.record(ObserverEvent::Fallback {
            attempt: last_attempt.attempt,
        });
    }

    fn on_success(&self, attempt: &AttemptContext, _elapsed: Duration) {
        self.record(ObserverEvent::Success {
            attempt: attempt.attempt,
        });
    }
}
