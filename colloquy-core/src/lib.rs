//! # colloquy-core
//!
//! Core types and error handling for the colloquy streaming conversation
//! client.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - **Conversations**: [`Conversation`], [`Message`], [`Role`], and the
//!   transient [`StreamingBuffer`]
//! - **Usage**: the advisory [`UsageSnapshot`] counters
//! - **Errors**: the [`ClientError`] taxonomy and [`FailureKind`]
//!   classification for user-facing failure text
//! - **Identifiers**: client-side message ids and timestamps
//!
//! ## Example
//!
//! ```rust
//! use colloquy_core::{FailureKind, Message, Role, StreamingBuffer};
//!
//! // An optimistic user message, created before any network confirmation.
//! let msg = Message::user("How do I replace a laptop battery?");
//! assert_eq!(msg.role, Role::User);
//!
//! // Streamed text accumulates outside the message list until final.
//! let mut buffer = StreamingBuffer::default();
//! buffer.append("Step one: ");
//! buffer.append("power the device down.");
//!
//! // Terminal failures are classified into conversational text.
//! let kind = FailureKind::classify("Authentication required");
//! assert_eq!(kind, FailureKind::Authentication);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod conversation;
pub mod errors;
pub mod identifier;
pub mod usage;

// Re-exports for convenience
pub use conversation::{Conversation, Message, Role, StreamingBuffer};
pub use errors::{ClientError, FailureKind, Result};
pub use identifier::{generate_message_id, now_utc};
pub use usage::{UsageSnapshot, DAILY_TOKEN_LIMIT};
