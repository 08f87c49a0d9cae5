//! Fallback data sources.
//!
//! A [`FallbackSource`] answers balance and transaction-history queries when
//! the primary backend is exhausted. Its results reach the caller untouched.

mod http;
mod snapshot;

pub use http::HttpFallbackSource;
pub use snapshot::SnapshotFallback;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::BankResult;
use crate::types::CustomerId;

/// Secondary provider for read-only financial queries.
#[async_trait]
pub trait FallbackSource: Send + Sync {
    /// Returns the customer's balance payload.
    async fn balance(&self, customer_id: CustomerId) -> BankResult<Value>;

    /// Returns the customer's transaction records.
    async fn transactions(&self, customer_id: CustomerId) -> BankResult<Value>;
}
