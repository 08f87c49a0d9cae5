//! Error types for the banking client.
//!
//! Every failure that reaches a caller is a [`BankError`]. Whatever the
//! variant, [`BankError::body`] yields the normalized shape: the backend's
//! structured error payload when one was returned, otherwise a message string.

use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for banking client operations.
pub type BankResult<T> = Result<T, BankError>;

/// The normalized error payload surfaced to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// Structured JSON body returned by the backend.
    Structured(serde_json::Value),
    /// Plain message when no structured body is available.
    Message(String),
}

impl ErrorBody {
    /// Returns the structured payload, if any.
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorBody::Structured(value) => Some(value),
            ErrorBody::Message(_) => None,
        }
    }

    /// Returns the plain message, if any.
    pub fn as_message(&self) -> Option<&str> {
        match self {
            ErrorBody::Structured(_) => None,
            ErrorBody::Message(message) => Some(message),
        }
    }

    /// Builds a body from raw response bytes.
    ///
    /// JSON bodies become [`ErrorBody::Structured`]; any other non-empty text
    /// is kept verbatim as a message; an empty body falls back to `fallback`.
    pub fn from_response_bytes(bytes: &[u8], fallback: impl Into<String>) -> Self {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) {
            if !value.is_null() {
                return ErrorBody::Structured(value);
            }
        }

        let text = String::from_utf8_lossy(bytes);
        let text = text.trim();
        if text.is_empty() {
            ErrorBody::Message(fallback.into())
        } else {
            ErrorBody::Message(text.to_string())
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Structured(value) => write!(f, "{}", value),
            ErrorBody::Message(message) => f.write_str(message),
        }
    }
}

/// Error type for banking client operations.
#[derive(Debug, Error)]
pub enum BankError {
    /// Client configuration is invalid (missing base URL, bad timeouts, ...).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration issue.
        message: String,
    },

    /// The backend rejected the request input (HTTP 400/422).
    #[error("Validation error (HTTP {status}): {body}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Normalized error body.
        body: ErrorBody,
    },

    /// The backend answered with any other non-success status.
    #[error("Backend error (HTTP {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Normalized error body.
        body: ErrorBody,
    },

    /// The attempt exceeded its duration budget.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Budget that was exceeded.
        timeout: Duration,
    },

    /// The backend could not be reached.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
    },

    /// The exchange failed for a reason other than reachability or timing.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// A request payload could not be encoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// A fallback data source could not produce a result.
    #[error("Fallback source error: {message}")]
    Fallback {
        /// Error message.
        message: String,
    },
}

impl BankError {
    /// Returns the normalized error body.
    pub fn body(&self) -> ErrorBody {
        match self {
            BankError::Validation { body, .. } | BankError::Api { body, .. } => body.clone(),
            BankError::Configuration { message }
            | BankError::Timeout { message, .. }
            | BankError::Network { message }
            | BankError::Protocol { message }
            | BankError::Serialization { message }
            | BankError::Fallback { message } => ErrorBody::Message(message.clone()),
        }
    }

    /// Returns the HTTP status for backend errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            BankError::Validation { status, .. } | BankError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BankError::Timeout { .. })
    }

    /// Returns true if the backend could not be reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, BankError::Network { .. })
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        BankError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a fallback source error.
    pub fn fallback(message: impl Into<String>) -> Self {
        BankError::Fallback {
            message: message.into(),
        }
    }

    /// Creates the error for a non-success HTTP response.
    ///
    /// 400 and 422 are treated as input validation failures.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let body = ErrorBody::from_response_bytes(
            body,
            format!("Request failed with status code {}", status),
        );
        match status {
            400 | 422 => BankError::Validation { status, body },
            _ => BankError::Api { status, body },
        }
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        BankError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for BankError {
    fn from(err: url::ParseError) -> Self {
        BankError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
