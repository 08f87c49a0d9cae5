//! Fallback source backed by a secondary HTTP endpoint.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use super::FallbackSource;
use crate::config::DEFAULT_BASE_TIMEOUT;
use crate::errors::{BankError, BankResult};
use crate::resilience::AttemptFailure;
use crate::services::paths;
use crate::transport::{HttpRequest, HttpTransport, HttpTransportImpl, TransportError};
use crate::types::CustomerId;

/// Reads balances and histories from a mirror of the banking API.
///
/// Each query is a single attempt; failures are reported, never retried.
pub struct HttpFallbackSource {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl HttpFallbackSource {
    /// Creates a source talking to `base_url` with the default base timeout.
    pub fn new(base_url: impl Into<String>) -> BankResult<Self> {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/');
        url::Url::parse(base_url)?;

        let transport = HttpTransportImpl::new(base_url, DEFAULT_BASE_TIMEOUT)
            .map_err(|e| BankError::configuration(e.to_string()))?;
        Ok(Self::with_transport(Arc::new(transport), DEFAULT_BASE_TIMEOUT))
    }

    /// Creates a source over an existing transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    async fn fetch(&self, path: String) -> BankResult<Value> {
        let request = HttpRequest::get(path)
            .with_header("Accept", "application/json")
            .with_timeout(self.timeout);

        let result = match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                timeout: self.timeout,
            }),
        };

        match result {
            Ok(response) if response.is_success() => Ok(response.payload()),
            Ok(response) => Err(AttemptFailure::Status(response).normalize()),
            Err(err) => Err(AttemptFailure::Transport(err).normalize()),
        }
    }
}

#[async_trait]
impl FallbackSource for HttpFallbackSource {
    #[instrument(skip(self))]
    async fn balance(&self, customer_id: CustomerId) -> BankResult<Value> {
        self.fetch(paths::balance(customer_id)).await
    }

    #[instrument(skip(self))]
    async fn transactions(&self, customer_id: CustomerId) -> BankResult<Value> {
        self.fetch(paths::customer_transactions(customer_id)).await
    }
}

impl std::fmt::Debug for HttpFallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFallbackSource")
            .field("timeout", &self.timeout)
            .finish()
    }
}
