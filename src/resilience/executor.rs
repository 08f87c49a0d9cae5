//! Request executor: one logical operation, at most two attempts, at most one
//! fallback.

use futures::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use super::classifier::{classify, AttemptFailure, FailureClass};
use super::policy::Operation;
use crate::config::{BankConfig, TimeoutPolicy};
use crate::errors::{BankError, BankResult};
use crate::observability::{AttemptContext, ExecutionObserver};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport, TransportError};

/// Header carrying the per-call request identifier.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Deferred call into a fallback source.
pub struct FallbackHandler(Box<dyn FnOnce() -> BoxFuture<'static, BankResult<Value>> + Send>);

impl FallbackHandler {
    /// Wraps a closure producing the fallback result.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = BankResult<Value>> + Send + 'static,
    {
        Self(Box::new(move || Box::pin(handler())))
    }

    async fn invoke(self) -> BankResult<Value> {
        (self.0)().await
    }
}

impl std::fmt::Debug for FallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FallbackHandler")
    }
}

/// Everything the executor needs to run one logical call.
#[derive(Debug)]
pub struct OperationDescriptor {
    /// Operation being executed.
    pub operation: Operation,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// JSON payload.
    pub payload: Option<Value>,
    /// Budget for the primary attempt.
    pub base_timeout: Duration,
    /// Budget for the retry, when one is allowed.
    pub extended_timeout: Option<Duration>,
    /// Whether a timed out primary attempt is retried.
    pub retry_eligible: bool,
    /// Whether the fallback handler may answer.
    pub fallback_eligible: bool,
    /// Fallback to use once the primary path is exhausted.
    pub fallback_handler: Option<FallbackHandler>,
}

impl OperationDescriptor {
    /// Creates a descriptor with eligibility and timeouts taken from the
    /// operation's policy.
    pub fn new(
        operation: Operation,
        method: HttpMethod,
        path: impl Into<String>,
        timeouts: &TimeoutPolicy,
    ) -> Self {
        let policy = operation.policy();
        Self {
            operation,
            method,
            path: path.into(),
            payload: None,
            base_timeout: timeouts.base,
            extended_timeout: policy.retry_timeout(timeouts),
            retry_eligible: policy.retry_eligible(),
            fallback_eligible: policy.fallback_eligible(),
            fallback_handler: None,
        }
    }

    /// Creates a GET descriptor.
    pub fn get(operation: Operation, path: impl Into<String>, timeouts: &TimeoutPolicy) -> Self {
        Self::new(operation, HttpMethod::Get, path, timeouts)
    }

    /// Creates a POST descriptor.
    pub fn post(operation: Operation, path: impl Into<String>, timeouts: &TimeoutPolicy) -> Self {
        Self::new(operation, HttpMethod::Post, path, timeouts)
    }

    /// Sets the JSON payload.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the fallback handler.
    pub fn with_fallback(mut self, handler: FallbackHandler) -> Self {
        self.fallback_handler = Some(handler);
        self
    }

    fn retry_timeout(&self) -> Option<Duration> {
        if self.retry_eligible {
            self.extended_timeout
        } else {
            None
        }
    }
}

/// Why an attempt failed in a way the policy may recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransientReason {
    /// The attempt ran out of time.
    Timeout,
    /// The backend could not be reached.
    Connectivity,
}

/// Result of a single HTTP attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The backend answered with a success status.
    Success(Value),
    /// The attempt failed in a way the policy may recover from.
    TransientFailure {
        /// Classified reason.
        reason: TransientReason,
        /// Normalized error to surface if nothing recovers.
        error: BankError,
    },
    /// The attempt failed for good.
    TerminalFailure(BankError),
}

/// Runs operation descriptors against a transport.
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    observer: Arc<dyn ExecutionObserver>,
    headers: HashMap<String, String>,
}

impl RequestExecutor {
    /// Creates a new executor.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        observer: Arc<dyn ExecutionObserver>,
        config: &BankConfig,
    ) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        for (name, value) in &config.custom_headers {
            headers.insert(name.clone(), value.clone());
        }

        Self {
            transport,
            observer,
            headers,
        }
    }

    /// Executes a descriptor, returning the backend payload or a normalized
    /// error.
    ///
    /// A fallback failure is returned exactly as the fallback produced it.
    pub async fn execute(&self, descriptor: OperationDescriptor) -> BankResult<Value> {
        let request_id = Uuid::new_v4();
        let request = self.build_request(&descriptor, request_id)?;

        let primary = self.context(&descriptor, request_id, 1, descriptor.base_timeout);
        match self.attempt(&request, &primary).await {
            AttemptOutcome::Success(payload) => Ok(payload),
            AttemptOutcome::TerminalFailure(error) => Err(error),
            AttemptOutcome::TransientFailure {
                reason: TransientReason::Timeout,
                error,
            } => {
                let Some(extended) = descriptor.retry_timeout() else {
                    return Err(error);
                };

                let retry = self.context(&descriptor, request_id, 2, extended);
                self.observer.on_retry(&retry);
                match self.attempt(&request, &retry).await {
                    AttemptOutcome::Success(payload) => Ok(payload),
                    AttemptOutcome::TransientFailure { error, .. }
                    | AttemptOutcome::TerminalFailure(error) => {
                        self.fall_back(descriptor, &retry, error).await
                    }
                }
            }
            AttemptOutcome::TransientFailure {
                reason: TransientReason::Connectivity,
                error,
            } => self.fall_back(descriptor, &primary, error).await,
        }
    }

    /// Sends one attempt and classifies its result.
    pub async fn attempt(&self, request: &HttpRequest, ctx: &AttemptContext) -> AttemptOutcome {
        self.observer.on_attempt_start(ctx);
        let started = Instant::now();

        let request = request.clone().with_timeout(ctx.timeout);
        let result = match tokio::time::timeout(ctx.timeout, self.transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                timeout: ctx.timeout,
            }),
        };

        let failure = match result {
            Ok(response) if response.is_success() => {
                self.observer.on_success(ctx, started.elapsed());
                return AttemptOutcome::Success(response.payload());
            }
            Ok(response) => AttemptFailure::Status(response),
            Err(err) => AttemptFailure::Transport(err),
        };

        let class = classify(&failure);
        let error = failure.normalize();
        self.observer.on_attempt_failure(ctx, class, &error);

        match class {
            FailureClass::TimeoutRetryable => AttemptOutcome::TransientFailure {
                reason: TransientReason::Timeout,
                error,
            },
            FailureClass::FallbackEligible => AttemptOutcome::TransientFailure {
                reason: TransientReason::Connectivity,
                error,
            },
            FailureClass::Terminal => AttemptOutcome::TerminalFailure(error),
        }
    }

    async fn fall_back(
        &self,
        descriptor: OperationDescriptor,
        last_attempt: &AttemptContext,
        error: BankError,
    ) -> BankResult<Value> {
        match descriptor.fallback_handler {
            Some(handler) if descriptor.fallback_eligible => {
                self.observer.on_fallback(last_attempt);
                handler.invoke().await
            }
            _ => Err(error),
        }
    }

    fn build_request(
        &self,
        descriptor: &OperationDescriptor,
        request_id: Uuid,
    ) -> BankResult<HttpRequest> {
        let mut request = HttpRequest {
            method: descriptor.method,
            path: descriptor.path.clone(),
            headers: self.headers.clone(),
            body: None,
            timeout: None,
        }
        .with_header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(payload) = &descriptor.payload {
            request = request.with_body(serde_json::to_vec(payload)?);
        }

        Ok(request)
    }

    fn context(
        &self,
        descriptor: &OperationDescriptor,
        request_id: Uuid,
        attempt: u32,
        timeout: Duration,
    ) -> AttemptContext {
        AttemptContext {
            operation: descriptor.operation,
            request_id,
            method: descriptor.method,
            path: descriptor.path.clone(),
            attempt,
            timeout,
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}
