//! Transaction request types.

use serde::{Deserialize, Serialize};

use super::CustomerId;

/// Body of the deposit and withdraw endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMovement {
    /// Customer whose account moves.
    pub customer_id: CustomerId,
    /// Amount moved.
    pub amount: f64,
    /// Free-form description.
    pub description: String,
}

/// Body of `POST /api/transactions/transfer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Debited customer.
    pub from_customer_id: CustomerId,
    /// Credited customer.
    pub to_customer_id: CustomerId,
    /// Amount transferred.
    pub amount: f64,
    /// Free-form description.
    pub description: String,
}
