//! Conversation and message types.
//!
//! These are the client's authoritative view of a thread: the conversation
//! metadata reported by the server and the append-only message list. The
//! transient per-stream text lives in [`StreamingBuffer`], never in the
//! message list, until it is final.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifier::{generate_message_id, now_utc};

/// A conversation as reported by the server.
///
/// A thread that exists only client-side (nothing sent yet) has no
/// `Conversation` entry at all; the server assigns the identifier when the
/// first message of a new thread completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Server-assigned opaque identifier.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// When the conversation last changed.
    #[serde(alias = "updated_at", alias = "started_at")]
    pub last_updated: DateTime<Utc>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human user.
    User,
    /// The assistant.
    Assistant,
}

/// One committed message in a conversation.
///
/// Messages are append-only and strictly ordered by creation; committed
/// content is never mutated or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier (client-generated for optimistic messages).
    pub id: String,
    /// Author role.
    pub role: Role,
    /// Final message text.
    pub content: String,
    /// Creation time.
    #[serde(alias = "created_at")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a locally-authored user message with a client-generated id.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id(),
            role: Role::User,
            content: content.into(),
            timestamp: now_utc(),
        }
    }

    /// Create an assistant message with a client-generated id.
    ///
    /// Used when a completed stream (or a synthesized failure notice) is
    /// committed to the message list.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: generate_message_id(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: now_utc(),
        }
    }
}

/// Transient per-stream state.
///
/// At most one instance exists per client, and only between "send" and
/// stream termination. Cleared on both success and failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingBuffer {
    /// Assistant text accumulated so far, in arrival order.
    pub content: String,
    /// Human-readable progress label, empty once tokens arrive.
    pub status: String,
}

impl StreamingBuffer {
    /// Append one incremental chunk of assistant output.
    pub fn append(&mut self, chunk: &str) {
        self.content.push_str(chunk);
    }

    /// Replace the progress label.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Reset to the empty state.
    pub fn clear(&mut self) {
        self.content.clear();
        self.status.clear();
    }

    /// True when neither content nor status is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.status.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_user_constructor() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "hello");
        assert!(msg.id.starts_with("msg_"));
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        let role: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, Role::Assistant);
    }

    #[test]
    fn test_message_accepts_created_at_alias() {
        let msg: Message = serde_json::from_str(
            r#"{"id":"m1","role":"user","content":"hi","created_at":"2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(msg.id, "m1");
        assert_eq!(msg.timestamp.to_rfc3339(), "2026-01-05T10:00:00+00:00");
    }

    #[test]
    fn test_conversation_accepts_updated_at_alias() {
        let conv: Conversation = serde_json::from_str(
            r#"{"id":"c1","title":"Fix a laptop","updated_at":"2026-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(conv.id, "c1");
        assert_eq!(conv.title, "Fix a laptop");
    }

    #[test]
    fn test_streaming_buffer_lifecycle() {
        let mut buffer = StreamingBuffer::default();
        assert!(buffer.is_empty());

        buffer.set_status("Thinking...");
        assert!(!buffer.is_empty());

        buffer.set_status("");
        buffer.append("Hello");
        buffer.append(" world");
        assert_eq!(buffer.content, "Hello world");

        buffer.clear();
        assert!(buffer.is_empty());
    }
}
