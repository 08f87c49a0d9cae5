//! Request payload types for the banking API.
//!
//! Responses are passed through as [`serde_json::Value`] exactly as the
//! backend (or a fallback source) produced them.

pub mod customers;
pub mod transactions;

/// Identifier of a customer.
pub type CustomerId = u64;

/// Identifier of a transaction.
pub type TransactionId = u64;

pub use customers::LoginRequest;
pub use transactions::{AccountMovement, TransferRequest};
