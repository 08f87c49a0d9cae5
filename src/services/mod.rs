//! Domain operation groups.
//!
//! Each operation maps one method call to one endpoint. Retry and fallback
//! behaviour comes from [`crate::resilience::Operation::policy`], never from
//! the service code itself.

mod customers;
mod transactions;

pub use customers::CustomerService;
pub use transactions::TransactionService;

/// Endpoint paths.
pub(crate) mod paths {
    use crate::types::{CustomerId, TransactionId};

    pub(crate) fn register() -> String {
        "/api/customers/register".to_string()
    }

    pub(crate) fn login() -> String {
        "/api/customer/login".to_string()
    }

    pub(crate) fn customer(customer_id: CustomerId) -> String {
        format!("/api/customers/{}", customer_id)
    }

    pub(crate) fn customer_by_username(username: &str) -> String {
        format!("/api/customers/username/{}", urlencoding::encode(username))
    }

    pub(crate) fn balance(customer_id: CustomerId) -> String {
        format!("/api/customers/{}/balance", customer_id)
    }

    pub(crate) fn deposit() -> String {
        "/api/transactions/deposit".to_string()
    }

    pub(crate) fn withdraw() -> String {
        "/api/transactions/withdraw".to_string()
    }

    pub(crate) fn transfer() -> String {
        "/api/transactions/transfer".to_string()
    }

    pub(crate) fn customer_transactions(customer_id: CustomerId) -> String {
        format!("/api/transactions/customer/{}", customer_id)
    }

    pub(crate) fn passbook(customer_id: CustomerId) -> String {
        format!("/api/transactions/customer/{}/passbook", customer_id)
    }

    pub(crate) fn debug_transactions(customer_id: CustomerId) -> String {
        format!("/api/transactions/debug/customer/{}", customer_id)
    }

    pub(crate) fn transaction(transaction_id: TransactionId) -> String {
        format!("/api/transactions/{}", transaction_id)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_username_is_a_single_segment() {
            assert_eq!(customer_by_username("alice"), "/api/customers/username/alice");
            assert_eq!(
                customer_by_username("john doe/x"),
                "/api/customers/username/john%20doe%2Fx"
            );
        }

        #[test]
        fn test_numeric_paths() {
            assert_eq!(customer(7), "/api/customers/7");
            assert_eq!(passbook(7), "/api/transactions/customer/7/passbook");
            assert_eq!(debug_transactions(7), "/api/transactions/debug/customer/7");
            assert_eq!(transaction(99), "/api/transactions/99");
        }
    }
}
