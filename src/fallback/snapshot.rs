//! In-memory fallback source holding application-provided snapshots.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::FallbackSource;
use crate::errors::{BankError, BankResult};
use crate::types::CustomerId;

/// Serves last-known balances and transaction histories.
///
/// Snapshots are whatever the application stores here; the client never
/// writes primary responses into it.
#[derive(Debug, Default)]
pub struct SnapshotFallback {
    balances: RwLock<HashMap<CustomerId, Value>>,
    transactions: RwLock<HashMap<CustomerId, Value>>,
}

impl SnapshotFallback {
    /// Creates an empty snapshot source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a balance snapshot.
    pub fn with_balance(mut self, customer_id: CustomerId, balance: Value) -> Self {
        self.balances.get_mut().insert(customer_id, balance);
        self
    }

    /// Seeds a transaction history snapshot.
    pub fn with_transactions(mut self, customer_id: CustomerId, transactions: Value) -> Self {
        self.transactions.get_mut().insert(customer_id, transactions);
        self
    }

    /// Replaces a customer's balance snapshot.
    pub async fn set_balance(&self, customer_id: CustomerId, balance: Value) {
        self.balances.write().await.insert(customer_id, balance);
    }

    /// Replaces a customer's transaction history snapshot.
    pub async fn set_transactions(&self, customer_id: CustomerId, transactions: Value) {
        self.transactions.write().await.insert(customer_id, transactions);
    }

    /// Drops every snapshot held for a customer.
    pub async fn forget(&self, customer_id: CustomerId) {
        self.balances.write().await.remove(&customer_id);
        self.transactions.write().await.remove(&customer_id);
    }
}

#[async_trait]
impl FallbackSource for SnapshotFallback {
    async fn balance(&self, customer_id: CustomerId) -> BankResult<Value> {
        self.balances
            .read()
            .await
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| {
                BankError::fallback(format!("No balance snapshot for customer {}", customer_id))
            })
    }

    async fn transactions(&self, customer_id: CustomerId) -> BankResult<Value> {
        self.transactions
            .read()
            .await
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| {
                BankError::fallback(format!(
                    "No transaction snapshot for customer {}",
                    customer_id
                ))
            })
    }
}
