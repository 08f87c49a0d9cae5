//! Banking API Client Library
//!
//! An async Rust client for a banking backend exposing customer registration,
//! authentication, balance lookups, deposits, withdrawals, transfers and
//! transaction history.
//!
//! # Features
//!
//! - **Timeout Retries**: Read-mostly operations get one retry with a longer budget
//! - **Fallback Sources**: Balance and history reads can defer to a secondary source
//! - **Declarative Policy**: Retry and fallback eligibility live in one table
//! - **Normalized Errors**: Every failure exposes the backend body or a message
//! - **Observability**: Tracing spans, lifecycle observers and atomic metrics
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bank_client::BankClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BankClient::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     client.transactions().deposit(42, 100.0, "paycheck").await?;
//!     let balance = client.customers().get_balance(42).await?;
//!     println!("{}", balance);
//!     Ok(())
//! }
//! ```
//!
//! # Fallback Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bank_client::{BankClient, HttpFallbackSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mirror = HttpFallbackSource::new("http://replica.internal:8080")?;
//!     let client = BankClient::builder()
//!         .base_url("http://localhost:8080")
//!         .fallback(Arc::new(mirror))
//!         .build()?;
//!
//!     match client.transactions().get_transactions(42).await {
//!         Ok(history) => println!("{}", history),
//!         Err(err) => eprintln!("{}", err.body()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod errors;
pub mod fallback;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{BankClient, BankClientBuilder};
pub use config::{BankConfig, TimeoutPolicy, TimeoutTier};
pub use errors::{BankError, BankResult, ErrorBody};
pub use fallback::{FallbackSource, HttpFallbackSource, SnapshotFallback};
pub use observability::{
    AttemptContext, ExecutionMetrics, ExecutionObserver, LoggingConfig, TracingObserver,
};
pub use resilience::{FailureClass, Operation, OperationPolicy};
pub use types::{AccountMovement, CustomerId, LoginRequest, TransactionId, TransferRequest};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
