//! Declarative retry and fallback policy per named operation.

use std::fmt;
use std::time::Duration;

use crate::config::{TimeoutPolicy, TimeoutTier};

/// Every named operation the client exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Register a new customer.
    Register,
    /// Authenticate a customer.
    Login,
    /// Look up a customer by ID.
    GetCustomerById,
    /// Look up a customer by username.
    GetByUsername,
    /// Read a customer's balance.
    GetBalance,
    /// Deposit funds.
    Deposit,
    /// Withdraw funds.
    Withdraw,
    /// Transfer funds between customers.
    Transfer,
    /// List a customer's transactions.
    GetTransactions,
    /// Read a customer's passbook.
    GetPassbook,
    /// Read the backend's debug view of a customer's transactions.
    DebugTransactions,
    /// Look up a single transaction.
    GetTransaction,
}

/// Retry and fallback eligibility for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationPolicy {
    /// Tier used for the single timeout retry; `None` disables retrying.
    pub retry_tier: Option<TimeoutTier>,
    /// Whether the fallback source may answer once the primary path is exhausted.
    pub fallback: bool,
}

impl OperationPolicy {
    const TERMINAL: Self = Self {
        retry_tier: None,
        fallback: false,
    };

    /// Returns true if a timed out attempt may be retried.
    pub fn retry_eligible(&self) -> bool {
        self.retry_tier.is_some()
    }

    /// Returns true if the fallback source may be consulted.
    pub fn fallback_eligible(&self) -> bool {
        self.fallback
    }

    /// Resolves the retry timeout against the configured tiers.
    pub fn retry_timeout(&self, timeouts: &TimeoutPolicy) -> Option<Duration> {
        self.retry_tier.map(|tier| timeouts.duration(tier))
    }
}

impl Operation {
    /// All operations, in declaration order.
    pub const ALL: [Operation; 12] = [
        Operation::Register,
        Operation::Login,
        Operation::GetCustomerById,
        Operation::GetByUsername,
        Operation::GetBalance,
        Operation::Deposit,
        Operation::Withdraw,
        Operation::Transfer,
        Operation::GetTransactions,
        Operation::GetPassbook,
        Operation::DebugTransactions,
        Operation::GetTransaction,
    ];

    /// Returns the operation's policy.
    pub fn policy(&self) -> OperationPolicy {
        match self {
            Operation::GetByUsername => OperationPolicy {
                retry_tier: Some(TimeoutTier::Extended),
                fallback: false,
            },
            Operation::GetBalance | Operation::GetTransactions => OperationPolicy {
                retry_tier: Some(TimeoutTier::Extended),
                fallback: true,
            },
            // Transfers retry under their own tier.
            Operation::Transfer => OperationPolicy {
                retry_tier: Some(TimeoutTier::Transfer),
                fallback: false,
            },
            Operation::Register
            | Operation::Login
            | Operation::GetCustomerById
            | Operation::Deposit
            | Operation::Withdraw
            | Operation::GetPassbook
            | Operation::DebugTransactions
            | Operation::GetTransaction => OperationPolicy::TERMINAL,
        }
    }

    /// Returns the operation name used in logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::GetCustomerById => "get_customer_by_id",
            Operation::GetByUsername => "get_by_username",
            Operation::GetBalance => "get_balance",
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
            Operation::Transfer => "transfer",
            Operation::GetTransactions => "get_transactions",
            Operation::GetPassbook => "get_passbook",
            Operation::DebugTransactions => "debug_transactions",
            Operation::GetTransaction => "get_transaction",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
