//! Failure classification.

use std::fmt;

use crate::errors::BankError;
use crate::transport::{HttpResponse, TransportError};

/// A failed attempt, before normalization.
#[derive(Debug, Clone)]
pub enum AttemptFailure {
    /// The transport could not complete the exchange.
    Transport(TransportError),
    /// The backend answered with a non-success status.
    Status(HttpResponse),
}

impl AttemptFailure {
    /// Returns the human-readable message for the failure.
    pub fn message(&self) -> String {
        match self {
            AttemptFailure::Transport(err) => err.to_string(),
            AttemptFailure::Status(response) => {
                format!("Request failed with status code {}", response.status)
            }
        }
    }

    /// Converts the failure into the normalized caller-facing error.
    pub fn normalize(self) -> BankError {
        match self {
            AttemptFailure::Status(response) => BankError::from_status(response.status, &response.body),
            AttemptFailure::Transport(err) => {
                let message = err.to_string();
                match err {
                    TransportError::Timeout { timeout } => BankError::Timeout { message, timeout },
                    TransportError::Connection { .. } | TransportError::Disconnected { .. } => {
                        BankError::Network { message }
                    }
                    TransportError::InvalidResponse { .. } => BankError::Protocol { message },
                }
            }
        }
    }
}

/// Disposition of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    /// The attempt ran out of time; a slower retry may succeed.
    TimeoutRetryable,
    /// The backend is unreachable; the fallback source may answer.
    FallbackEligible,
    /// Surface the failure as-is.
    Terminal,
}

impl FailureClass {
    /// Returns the class name used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureClass::TimeoutRetryable => "timeout_retryable",
            FailureClass::FallbackEligible => "fallback_eligible",
            FailureClass::Terminal => "terminal",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a failed attempt.
///
/// Rules apply in order: an exceeded deadline is retryable; a refused or
/// dropped connection, or a message mentioning `Network Error` or `timeout`,
/// is fallback-eligible; everything else is terminal.
pub fn classify(failure: &AttemptFailure) -> FailureClass {
    match failure {
        AttemptFailure::Transport(TransportError::Timeout { .. }) => FailureClass::TimeoutRetryable,
        AttemptFailure::Transport(
            TransportError::Connection { .. } | TransportError::Disconnected { .. },
        ) => FailureClass::FallbackEligible,
        AttemptFailure::Transport(TransportError::InvalidResponse { message }) => {
            if mentions_network_failure(message) {
                FailureClass::FallbackEligible
            } else {
                FailureClass::Terminal
            }
        }
        AttemptFailure::Status(_) => FailureClass::Terminal,
    }
}

fn mentions_network_failure(message: &str) -> bool {
    message.contains("Network Error") || message.contains("timeout")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use test_case::test_case;

    fn status(code: u16, body: &str) -> AttemptFailure {
        AttemptFailure::Status(HttpResponse {
            status: code,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        })
    }

    #[test]
    fn test_timeout_is_retryable() {
        let failure = AttemptFailure::Transport(TransportError::Timeout {
            timeout: Duration::from_secs(10),
        });
        assert_eq!(classify(&failure), FailureClass::TimeoutRetryable);
    }

    #[test_case(TransportError::Connection { message: "connection refused".into() } ; "refused")]
    #[test_case(TransportError::Disconnected { message: "connection reset".into() } ; "reset")]
    #[test_case(TransportError::InvalidResponse { message: "Network Error".into() } ; "network error text")]
    #[test_case(TransportError::InvalidResponse { message: "body read timeout".into() } ; "timeout text")]
    fn test_connectivity_is_fallback_eligible(err: TransportError) {
        assert_eq!(
            classify(&AttemptFailure::Transport(err)),
            FailureClass::FallbackEligible
        );
    }

    #[test_case(status(401, r#"{"error":"invalid credentials"}"#) ; "unauthorized")]
    #[test_case(status(500, "") ; "server error")]
    #[test_case(status(504, "gateway timeout") ; "gateway timeout body")]
    #[test_case(AttemptFailure::Transport(TransportError::InvalidResponse { message: "bad chunk".into() }) ; "decode")]
    fn test_terminal(failure: AttemptFailure) {
        assert_eq!(classify(&failure), FailureClass::Terminal);
    }

    #[test]
    fn test_normalize_keeps_backend_body() {
        let error = status(401, r#"{"error":"invalid credentials"}"#).normalize();
        assert_eq!(
            error.body().as_structured(),
            Some(&serde_json::json!({"error": "invalid credentials"}))
        );
    }

    #[test]
    fn test_normalize_transport_failures() {
        let timeout = AttemptFailure::Transport(TransportError::Timeout {
            timeout: Duration::from_millis(10_000),
        })
        .normalize();
        assert!(timeout.is_timeout());
        assert_eq!(timeout.body().as_message(), Some("timeout of 10000ms exceeded"));

        let refused = AttemptFailure::Transport(TransportError::Connection {
            message: "refused".into(),
        })
        .normalize();
        assert!(refused.is_connectivity());
    }

    #[test]
    fn test_status_message() {
        assert_eq!(status(404, "").message(), "Request failed with status code 404");
    }
}
