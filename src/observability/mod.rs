//! Observability module for the banking client.
//!
//! The request executor reports its lifecycle to an [`ExecutionObserver`]
//! instead of logging directly. [`TracingObserver`] is the default.

mod logging;
mod metrics;

pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use metrics::{ExecutionMetrics, MetricsSnapshot};

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::BankError;
use crate::resilience::{FailureClass, Operation};
use crate::transport::HttpMethod;

/// Identifies one attempt of one logical call.
#[derive(Debug, Clone)]
pub struct AttemptContext {
    /// Operation being executed.
    pub operation: Operation,
    /// Identifier shared by every attempt of the call.
    pub request_id: Uuid,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// 1 for the primary attempt, 2 for the retry.
    pub attempt: u32,
    /// Budget for this attempt.
    pub timeout: Duration,
}

/// Lifecycle hooks invoked by the request executor.
///
/// All methods default to no-ops. Implementations must not panic; their
/// return values are ignored and cannot influence the policy.
pub trait ExecutionObserver: Send + Sync {
    /// An attempt is about to be sent.
    fn on_attempt_start(&self, _attempt: &AttemptContext) {}

    /// An attempt failed and was classified.
    fn on_attempt_failure(&self, _attempt: &AttemptContext, _class: FailureClass, _error: &BankError) {}

    /// A retry is about to be sent; `attempt` describes the retry.
    fn on_retry(&self, _attempt: &AttemptContext) {}

    /// The fallback source is being consulted after `last_attempt` failed.
    fn on_fallback(&self, _last_attempt: &AttemptContext) {}

    /// An attempt succeeded.
    fn on_success(&self, _attempt: &AttemptContext, _elapsed: Duration) {}
}

/// Observer that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExecutionObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: &AttemptContext) {
        tracing::debug!(
            operation = attempt.operation.name(),
            request_id = %attempt.request_id,
            method = attempt.method.as_str(),
            path = %attempt.path,
            attempt = attempt.attempt,
            timeout_ms = attempt.timeout.as_millis() as u64,
            "Sending request"
        );
    }

    fn on_attempt_failure(&self, attempt: &AttemptContext, class: FailureClass, error: &BankError) {
        tracing::warn!(
            operation = attempt.operation.name(),
            request_id = %attempt.request_id,
            attempt = attempt.attempt,
            class = class.as_str(),
            error = %error,
            "Request attempt failed"
        );
    }

    fn on_retry(&self, attempt: &AttemptContext) {
        tracing::info!(
            operation = attempt.operation.name(),
            request_id = %attempt.request_id,
            timeout_ms = attempt.timeout.as_millis() as u64,
            "Retrying with longer timeout"
        );
    }

    fn on_fallback(&self, last_attempt: &AttemptContext) {
        tracing::info!(
            operation = last_attempt.operation.name(),
            request_id = %last_attempt.request_id,
            "Using fallback source"
        );
    }

    fn on_success(&self, attempt: &AttemptContext, elapsed: Duration) {
        tracing::debug!(
            operation = attempt.operation.name(),
            request_id = %attempt.request_id,
            attempt = attempt.attempt,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request succeeded"
        );
    }
}

/// Observer that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

/// Forwards every hook to each inner observer in order.
#[derive(Default, Clone)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn ExecutionObserver>>,
}

impl FanoutObserver {
    /// Creates an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer.
    pub fn with(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl ExecutionObserver for FanoutObserver {
    fn on_attempt_start(&self, attempt: &AttemptContext) {
        for observer in &self.observers {
            observer.on_attempt_start(attempt);
        }
    }

    fn on_attempt_failure(&self, attempt: &AttemptContext, class: FailureClass, error: &BankError) {
        for observer in &self.observers {
            observer.on_attempt_failure(attempt, class, error);
        }
    }

    fn on_retry(&self, attempt: &AttemptContext) {
        for observer in &self.observers {
            observer.on_retry(attempt);
        }
    }

    fn on_fallback(&self, last_attempt: &AttemptContext) {
        for observer in &self.observers {
            observer.on_fallback(last_attempt);
        }
    }

    fn on_success(&self, attempt: &AttemptContext, elapsed: Duration) {
        for observer in &self.observers {
            observer.on_success(attempt, elapsed);
        }
    }
}

impl std::fmt::Debug for FanoutObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}
