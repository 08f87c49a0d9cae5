//! Execution metrics for the banking client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{AttemptContext, ExecutionObserver};
use crate::errors::BankError;
use crate::resilience::{FailureClass, Operation};

/// Point-in-time copy of [`ExecutionMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Attempts sent, primary and retry.
    pub attempts: u64,
    /// Attempts that succeeded.
    pub successes: u64,
    /// Failed attempts classified as timeouts.
    pub timeouts: u64,
    /// Failed attempts classified as connectivity failures.
    pub connectivity_failures: u64,
    /// Failed attempts classified as terminal.
    pub terminal_failures: u64,
    /// Retries issued.
    pub retries: u64,
    /// Fallback invocations.
    pub fallbacks: u64,
    /// Total latency of successful attempts, in milliseconds.
    pub total_latency_ms: u64,
    /// Attempts per operation name.
    pub operations: HashMap<&'static str, u64>,
}

impl MetricsSnapshot {
    /// Calculates average latency of successful attempts in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        if self.successes == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.successes as f64
        }
    }

    /// Returns the number of failed attempts.
    pub fn failures(&self) -> u64 {
        self.timeouts + self.connectivity_failures + self.terminal_failures
    }
}

/// Observer that counts lifecycle events with atomic counters.
#[derive(Debug)]
pub struct ExecutionMetrics {
    attempts: AtomicU64,
    successes: AtomicU64,
    timeouts: AtomicU64,
    connectivity_failures: AtomicU64,
    terminal_failures: AtomicU64,
    retries: AtomicU64,
    fallbacks: AtomicU64,
    total_latency_ms: AtomicU64,
    per_operation: [AtomicU64; Operation::ALL.len()],
}

impl ExecutionMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            successes: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            connectivity_failures: AtomicU64::new(0),
            terminal_failures: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            per_operation: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Returns the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let operations = Operation::ALL
            .iter()
            .zip(&self.per_operation)
            .filter_map(|(operation, count)| {
                let count = count.load(Ordering::Relaxed);
                (count > 0).then_some((operation.name(), count))
            })
            .collect();

        MetricsSnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            connectivity_failures: self.connectivity_failures.load(Ordering::Relaxed),
            terminal_failures: self.terminal_failures.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            operations,
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.attempts,
            &self.successes,
            &self.timeouts,
            &self.connectivity_failures,
            &self.terminal_failures,
            &self.retries,
            &self.fallbacks,
            &self.total_latency_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        for counter in &self.per_operation {
            counter.store(0, Ordering::Relaxed);
        }
    }

    fn operation_index(operation: Operation) -> usize {
        Operation::ALL
            .iter()
            .position(|candidate| *candidate == operation)
            .unwrap_or(0)
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionObserver for ExecutionMetrics {
    fn on_attempt_start(&self, attempt: &AttemptContext) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.per_operation[Self::operation_index(attempt.operation)].fetch_add(1, Ordering::Relaxed);
    }

    fn on_attempt_failure(&self, _attempt: &AttemptContext, class: FailureClass, _error: &BankError) {
        let counter = match class {
            FailureClass::TimeoutRetryable => &self.timeouts,
            FailureClass::FallbackEligible => &self.connectivity_failures,
            FailureClass::Terminal => &self.terminal_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn on_retry(&self, _attempt: &AttemptContext) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    fn on_fallback(&self, _last_attempt: &AttemptContext) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    fn on_success(&self, _attempt: &AttemptContext, elapsed: Duration) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }
}
