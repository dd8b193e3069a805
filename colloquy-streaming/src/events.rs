//! Typed protocol events.
//!
//! Each record on the wire is one line, `data: <json>`, where the JSON
//! object carries a `type` discriminator. The closed [`StreamEvent`] union
//! is the only thing the decoder ever emits.

use serde::{Deserialize, Serialize};

/// One decoded protocol event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Transient progress label shown while the assistant works.
    Status {
        /// Human-readable label, e.g. "Searching repair guides...".
        message: String,
    },
    /// One incremental chunk of assistant output, concatenated in arrival
    /// order.
    Token {
        /// The chunk text.
        content: String,
    },
    /// Terminal success marker.
    Done {
        /// Present only when this transaction created the conversation.
        #[serde(
            rename = "conversationId",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        conversation_id: Option<String>,
    },
    /// Terminal failure marker.
    Error {
        /// Server-provided failure message.
        message: String,
        /// Optional extra detail.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl StreamEvent {
    /// True for `done` and `error`, the two terminal markers.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }
}

/// Outcome of decoding one candidate record.
///
/// Malformed records are skipped, not raised: the decoder's loop is a fold
/// over these outcomes, and a single bad record never ends the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The record parsed into an event.
    Event(StreamEvent),
    /// The record was unusable and has been logged and dropped.
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_payload() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"status","message":"Thinking..."}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Status {
                message: "Thinking...".into()
            }
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_token_payload() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"token","content":"Hello"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Token {
                content: "Hello".into()
            }
        );
    }

    #[test]
    fn test_done_with_conversation_id() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"done","conversationId":"c42"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Done {
                conversation_id: Some("c42".into())
            }
        );
        assert!(event.is_terminal());
    }

    #[test]
    fn test_done_without_conversation_id() {
        let event: StreamEvent = serde_json::from_str(r#"{"type":"done"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Done {
                conversation_id: None
            }
        );
    }

    #[test]
    fn test_error_payload() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"error","message":"rate limited","details":"429"}"#)
                .unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "rate limited".into(),
                details: Some("429".into())
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<StreamEvent, _> =
            serde_json::from_str(r#"{"type":"metrics","value":1}"#);
        assert!(result.is_err());
    }
}
