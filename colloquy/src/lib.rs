//! # colloquy
//!
//! A streaming conversation client for chat-assistant services.
//!
//! colloquy keeps a consistent local view of conversations while a reply is
//! generated token-by-token over a streaming HTTP protocol. The user's
//! message appears immediately (optimistic), streamed text accumulates in a
//! transient buffer, and only final text ever lands in the message list —
//! across dropped connections, malformed frames, and server-reported
//! failures.
//!
//! ## Quick Start
//!
//! ```ignore
//! use colloquy::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ChatClient::new(
//!         ClientConfig::from_env("COLLOQUY").with_api_token("tok_..."),
//!     );
//!     let store = client.store();
//!
//!     client.refresh().await;
//!     client.send("My laptop won't turn on").await;
//!
//!     for message in store.messages() {
//!         println!("{:?}: {}", message.role, message.content);
//!     }
//! }
//! ```
//!
//! ## Key Guarantees
//!
//! - **Chunking-invariant decoding**: the frame decoder yields the same
//!   events however the bytes are split, even mid-character
//! - **Single-flight**: at most one streaming transaction per client
//! - **No lost or duplicated messages**: the optimistic user message is
//!   kept on failure, and the streamed reply is committed exactly once
//! - **Failures stay conversational**: terminal stream errors become a
//!   classified assistant message plus a dismissible error slot
//!
//! ## Architecture
//!
//! colloquy is organized as a workspace of focused crates:
//!
//! - [`colloquy_core`] - Conversation types, usage counters, and errors
//! - [`colloquy_streaming`] - Wire-frame decoding and the event stream
//! - [`colloquy_client`] - Transport, store, controller, and read-side sync

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub use colloquy_client::{
    ChatApi, ChatClient, ClientConfig, ConversationStore, StreamPhase, DEFAULT_BASE_URL,
};
pub use colloquy_core::{
    ClientError, Conversation, FailureKind, Message, Role, StreamingBuffer, UsageSnapshot,
    DAILY_TOKEN_LIMIT,
};
pub use colloquy_streaming::{Decoded, EventStream, FrameDecoder, StreamEvent};

/// Prelude for common imports.
pub mod prelude {
    pub use colloquy_client::{ChatClient, ClientConfig, ConversationStore, StreamPhase};
    pub use colloquy_core::{
        ClientError, Conversation, FailureKind, Message, Role, UsageSnapshot,
    };
    pub use colloquy_streaming::{FrameDecoder, StreamEvent};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let _ = StreamPhase::Idle;
        let store = ConversationStore::new();
        assert!(store.messages().is_empty());
    }
}
