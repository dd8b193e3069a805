//! Error types for colloquy.
//!
//! Four kinds of failure reach the client, and only one of them is fatal to
//! anything larger than a single record: a `Protocol` failure is skipped, a
//! `Connection` or `ServerReported` failure terminates the current streaming
//! transaction, and a `ReadSync` failure only marks the error slot.

use thiserror::Error;

/// The error type for client operations.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The transport could not be opened, or dropped mid-stream.
    #[error("connection error: {0}")]
    Connection(String),

    /// A single protocol record could not be decoded.
    ///
    /// Never terminal: the decoder logs and skips the record. The variant
    /// exists for surfaces that need to name the failure.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server sent an explicit `error` event.
    ///
    /// Terminal for the transaction, not for the client. Displays as the
    /// server's message so the error slot shows it verbatim.
    #[error("{message}")]
    ServerReported {
        /// Server-provided failure message.
        message: String,
        /// Optional extra detail, not shown to the user.
        details: Option<String>,
    },

    /// A list/history/usage/profile fetch failed.
    #[error("request failed: {0}")]
    ReadSync(String),
}

impl ClientError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a server-reported error.
    pub fn server_reported(message: impl Into<String>, details: Option<String>) -> Self {
        Self::ServerReported {
            message: message.into(),
            details,
        }
    }

    /// Create a read-side sync error.
    pub fn read_sync(message: impl Into<String>) -> Self {
        Self::ReadSync(message.into())
    }

    /// The text that goes into the user-visible error slot.
    #[must_use]
    pub fn slot_message(&self) -> String {
        match self {
            Self::ServerReported { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

/// Classification of a terminal stream failure, used to pick the
/// conversational text of the synthetic assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The credential was rejected.
    Authentication,
    /// The request took too long.
    Timeout,
    /// The network or connection failed.
    Network,
    /// Anything else.
    Other,
}

impl FailureKind {
    /// Classify a failure by matching its message against known categories.
    #[must_use]
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("authentication") || lower.contains("unauthorized") {
            Self::Authentication
        } else if lower.contains("timeout") || lower.contains("timed out") {
            Self::Timeout
        } else if lower.contains("connection") || lower.contains("network") {
            Self::Network
        } else {
            Self::Other
        }
    }

    /// The conversational text for the synthetic assistant message.
    #[must_use]
    pub fn assistant_text(&self, raw: &str) -> String {
        match self {
            Self::Authentication => "Please sign in to continue chatting.".to_string(),
            Self::Timeout => {
                "The request took too long. Please try a simpler question.".to_string()
            }
            Self::Network => {
                "Unable to reach the assistant right now. Please check your connection and try again."
                    .to_string()
            }
            Self::Other => {
                if raw.is_empty() {
                    "Sorry, something went wrong. Please try again.".to_string()
                } else {
                    format!("Sorry, something went wrong. {raw}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_reported_displays_message_only() {
        let err = ClientError::server_reported("rate limited", Some("429".into()));
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.slot_message(), "rate limited");
    }

    #[test]
    fn test_connection_slot_message_keeps_prefix() {
        let err = ClientError::connection("dns lookup failed");
        assert_eq!(err.slot_message(), "connection error: dns lookup failed");
    }

    #[test]
    fn test_classify_authentication() {
        assert_eq!(
            FailureKind::classify("Authentication required"),
            FailureKind::Authentication
        );
        assert_eq!(
            FailureKind::classify("401 unauthorized"),
            FailureKind::Authentication
        );
    }

    #[test]
    fn test_classify_timeout() {
        assert_eq!(FailureKind::classify("request timeout"), FailureKind::Timeout);
        assert_eq!(
            FailureKind::classify("operation timed out"),
            FailureKind::Timeout
        );
    }

    #[test]
    fn test_classify_network() {
        assert_eq!(
            FailureKind::classify("connection error: refused"),
            FailureKind::Network
        );
    }

    #[test]
    fn test_classify_fallback() {
        assert_eq!(FailureKind::classify("rate limited"), FailureKind::Other);
        let text = FailureKind::Other.assistant_text("rate limited");
        assert!(text.contains("rate limited"));
    }

    #[test]
    fn test_other_with_empty_raw() {
        let text = FailureKind::Other.assistant_text("");
        assert_eq!(text, "Sorry, something went wrong. Please try again.");
    }
}
