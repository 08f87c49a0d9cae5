//! HTTP transport layer for the banking client.
//!
//! The [`HttpTransport`] trait is the seam between the request executor and
//! the wire. [`HttpTransportImpl`] is the `reqwest` implementation; tests plug
//! in scripted transports instead.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::time::Duration;

/// Transport error types.
///
/// These never leave the crate's public operations: the executor classifies
/// and normalizes them into [`crate::BankError`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// No connection could be established.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// The connection dropped while the request was in flight.
    #[error("Network Error: {message}")]
    Disconnected {
        /// Error message.
        message: String,
    },

    /// The attempt exceeded its duration budget.
    #[error("timeout of {}ms exceeded", .timeout.as_millis())]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}
