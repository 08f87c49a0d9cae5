//! Banking API client.
//!
//! Provides the main client interface for interacting with the banking backend.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{BankConfig, BankConfigBuilder, TimeoutPolicy};
use crate::errors::{BankError, BankResult};
use crate::fallback::FallbackSource;
use crate::observability::{ExecutionObserver, FanoutObserver, TracingObserver};
use crate::resilience::RequestExecutor;
use crate::services::{CustomerService, TransactionService};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main banking client.
///
/// Provides access to the customer and transaction operation groups. Every
/// call goes through a shared [`RequestExecutor`], so retry and fallback
/// behaviour is uniform across the client.
///
/// # Example
///
/// ```rust,no_run
/// use bank_client::BankClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BankClient::builder()
///         .base_url("http://localhost:8080")
///         .build()?;
///
///     let balance = client.customers().get_balance(42).await?;
///     println!("{}", balance);
///     Ok(())
/// }
/// ```
pub struct BankClient {
    config: BankConfig,
    customers: CustomerService,
    transactions: TransactionService,
}

impl BankClient {
    /// Creates a new client builder.
    pub fn builder() -> BankClientBuilder {
        BankClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`BankConfig::from_env`] for the variables read.
    pub fn from_env() -> BankResult<Self> {
        let config = BankConfig::from_env()?;
        BankClientBuilder::new().config(config).build()
    }

    /// Returns the customer operations.
    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }

    /// Returns the transaction operations.
    pub fn transactions(&self) -> &TransactionService {
        &self.transactions
    }

    /// Returns the configuration.
    pub fn config(&self) -> &BankConfig {
        &self.config
    }
}

impl std::fmt::Debug for BankClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the banking client.
pub struct BankClientBuilder {
    config_builder: BankConfigBuilder,
    config: Option<BankConfig>,
    transport: Option<Arc<dyn HttpTransport>>,
    observers: Vec<Arc<dyn ExecutionObserver>>,
    tracing: bool,
    fallback: Option<Arc<dyn FallbackSource>>,
}

impl BankClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: BankConfigBuilder::new(),
            config: None,
            transport: None,
            observers: Vec::new(),
            tracing: true,
            fallback: None,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the base timeout.
    pub fn base_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.base_timeout(timeout);
        self
    }

    /// Sets all timeout tiers at once.
    pub fn timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.config_builder = self.config_builder.timeouts(timeouts);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Uses a prebuilt configuration, ignoring the individual setters.
    pub fn config(mut self, config: BankConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Adds an execution observer.
    pub fn observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Disables the default tracing observer.
    pub fn without_tracing(mut self) -> Self {
        self.tracing = false;
        self
    }

    /// Sets the fallback source consulted by fallback-eligible operations.
    pub fn fallback(mut self, source: Arc<dyn FallbackSource>) -> Self {
        self.fallback = Some(source);
        self
    }

    /// Builds the client.
    pub fn build(self) -> BankResult<BankClient> {
        let config = match self.config {
            Some(config) => {
                config.timeouts.validate()?;
                config
            }
            None => self.config_builder.build()?,
        };

        // Per-request timeouts narrow this; the client ceiling must fit the longest tier.
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeouts.transfer)
                    .map_err(|e| BankError::configuration(e.to_string()))?,
            ),
        };

        let mut observer = FanoutObserver::new();
        if self.tracing {
            observer = observer.with(Arc::new(TracingObserver));
        }
        for extra in self.observers {
            observer = observer.with(extra);
        }

        let executor = Arc::new(RequestExecutor::new(transport, Arc::new(observer), &config));

        let customers = CustomerService::new(
            Arc::clone(&executor),
            config.timeouts,
            self.fallback.clone(),
        );
        let transactions = TransactionService::new(
            Arc::clone(&executor),
            config.timeouts,
            self.fallback,
        );

        tracing::debug!(base_url = %config.base_url, "Bank client initialized");

        Ok(BankClient {
            config,
            customers,
            transactions,
        })
    }
}

impl Default for BankClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
