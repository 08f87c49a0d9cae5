//! Resilience layer for the banking client.
//!
//! Three pieces cooperate:
//!
//! - [`Operation::policy`]: the per-operation table of retry and fallback eligibility.
//! - [`classify`]: decides whether a failed attempt timed out, lost
//!   connectivity, or is terminal.
//! - [`RequestExecutor`]: interprets a descriptor built from the table, issuing
//!   at most one timeout-extended retry and at most one fallback call.

mod classifier;
mod executor;
mod policy;

pub use classifier::{classify, AttemptFailure, FailureClass};
pub use executor::{
    AttemptOutcome, FallbackHandler, OperationDescriptor, RequestExecutor, TransientReason,
    REQUEST_ID_HEADER,
};
pub use policy::{Operation, OperationPolicy};
