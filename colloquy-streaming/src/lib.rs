//! # colloquy-streaming
//!
//! Frame decoding for the colloquy streaming protocol.
//!
//! The server answers a send with a streaming body of prefixed text lines
//! (`data: <json>`); this crate turns arbitrarily-chunked bytes of that body
//! into a lazy sequence of typed events:
//!
//! - **[`FrameDecoder`]**: stateful chunk-to-event decoder that carries
//!   partial lines and partial UTF-8 code points across chunk boundaries
//! - **[`StreamEvent`]**: the closed event union (`status`, `token`,
//!   `done`, `error`)
//! - **[`EventStream`]**: `futures::Stream` adapter over a byte stream
//! - **[`Decoded`]**: per-record decode outcome, so one malformed record is
//!   skipped instead of ending the stream
//!
//! ## Example
//!
//! ```rust
//! use colloquy_streaming::{FrameDecoder, StreamEvent};
//!
//! let mut decoder = FrameDecoder::new();
//! // Chunks may split anywhere, even inside a record.
//! let mut events = decoder.feed(b"data: {\"type\":\"token\",").unwrap();
//! events.extend(decoder.feed(b"\"content\":\"Hi\"}\n").unwrap());
//! events.extend(decoder.finish());
//!
//! assert_eq!(events, vec![StreamEvent::Token { content: "Hi".into() }]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod events;
pub mod frame;
pub mod stream;

// Re-exports
pub use error::{StreamError, StreamResult};
pub use events::{Decoded, StreamEvent};
pub use frame::{decode_line, FrameDecoder, RECORD_PREFIX};
pub use stream::EventStream;
