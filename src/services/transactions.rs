//! Transaction operations.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::paths;
use crate::config::TimeoutPolicy;
use crate::errors::BankResult;
use crate::fallback::FallbackSource;
use crate::resilience::{FallbackHandler, Operation, OperationDescriptor, RequestExecutor};
use crate::types::{AccountMovement, CustomerId, TransactionId, TransferRequest};

/// Money movements and transaction history.
pub struct TransactionService {
    executor: Arc<RequestExecutor>,
    timeouts: TimeoutPolicy,
    fallback: Option<Arc<dyn FallbackSource>>,
}

impl TransactionService {
    /// Creates a new transaction service.
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

    /// Deposits funds. Never retried.
    #[instrument(skip(self, description))]
    pub async fn deposit(
        &self,
        customer_id: CustomerId,
        amount: f64,
        description: impl Into<String>,
    ) -> BankResult<Value> {
        let body = AccountMovement {
            customer_id,
            amount,
            description: description.into(),
        };
        let descriptor =
            OperationDescriptor::post(Operation::Deposit, paths::deposit(), &self.timeouts)
                .with_payload(serde_json::to_value(&body)?);
        self.executor.execute(descriptor).await
    }

    /// Withdraws funds. Never retried.
    #[instrument(skip(self, description))]
    pub async fn withdraw(
        &self,
        customer_id: CustomerId,
        amount: f64,
        description: impl Into<String>,
    ) -> BankResult<Value> {
        let body = AccountMovement {
            customer_id,
            amount,
            description: description.into(),
        };
        let descriptor =
            OperationDescriptor::post(Operation::Withdraw, paths::withdraw(), &self.timeouts)
                .with_payload(serde_json::to_value(&body)?);
        self.executor.execute(descriptor).await
    }

    /// Transfers funds between customers.
    ///
    /// A timed out transfer is retried once under the transfer timeout tier.
    #[instrument(skip(self, description))]
    pub async fn transfer(
        &self,
        from_customer_id: CustomerId,
        to_customer_id: CustomerId,
        amount: f64,
        description: impl Into<String>,
    ) -> BankResult<Value> {
        let body = TransferRequest {
            from_customer_id,
            to_customer_id,
            amount,
            description: description.into(),
        };
        let descriptor =
            OperationDescriptor::post(Operation::Transfer, paths::transfer(), &self.timeouts)
                .with_payload(serde_json::to_value(&body)?);
        self.executor.execute(descriptor).await
    }

    /// Lists a customer's transactions, retrying once on timeout and falling
    /// back to the secondary source when configured.
    #[instrument(skip(self))]
    pub async fn get_transactions(&self, customer_id: CustomerId) -> BankResult<Value> {
        let mut descriptor = OperationDescriptor::get(
            Operation::GetTransactions,
            paths::customer_transactions(customer_id),
            &self.timeouts,
        );
        if let Some(source) = &self.fallback {
            let source = Arc::clone(source);
            descriptor = descriptor.with_fallback(FallbackHandler::new(move || async move {
                source.transactions(customer_id).await
            }));
        }
        self.executor.execute(descriptor).await
    }

    /// Fetches a customer's passbook.
    #[instrument(skip(self))]
    pub async fn get_passbook(&self, customer_id: CustomerId) -> BankResult<Value> {
        let descriptor = OperationDescriptor::get(
            Operation::GetPassbook,
            paths::passbook(customer_id),
            &self.timeouts,
        );
        self.executor.execute(descriptor).await
    }

    /// Fetches the backend's debug view of a customer's transactions.
    #[instrument(skip(self))]
    pub async fn debug_transactions(&self, customer_id: CustomerId) -> BankResult<Value> {
        let descriptor = OperationDescriptor::get(
            Operation::DebugTransactions,
            paths::debug_transactions(customer_id),
            &self.timeouts,
        );
        self.executor.execute(descriptor).await
    }

    /// Fetches a single transaction.
    #[instrument(skip(self))]
    pub async fn get_transaction(&self, transaction_id: TransactionId) -> BankResult<Value> {
        let descriptor = OperationDescriptor::get(
            Operation::GetTransaction,
            paths::transaction(transaction_id),
            &self.timeouts,
        );
        self.executor.execute(descriptor).await
    }
}

impl std::fmt::Debug for TransactionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionService")
            .field("timeouts", &self.timeouts)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
