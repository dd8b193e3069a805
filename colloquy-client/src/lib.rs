//! # colloquy-client
//!
//! The conversation client: transport, store, controller, and read-side
//! sync for a streaming conversational-assistant service.
//!
//! - **[`ChatClient`]**: the outward interface — `send`,
//!   `select_conversation`, `delete_conversation`, `refresh`, and friends
//! - **[`ConversationStore`]**: the single owner of observable state
//!   (messages, streaming buffer, error slot, usage, loading flags)
//! - **[`ChatApi`]**: bearer-authenticated HTTP transport
//! - **[`ClientConfig`]**: base URL, credential, timeout
//!
//! ## Example
//!
//! ```ignore
//! use colloquy_client::{ChatClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ChatClient::new(
//!         ClientConfig::from_env("COLLOQUY").with_api_token("tok_..."),
//!     );
//!     let store = client.store();
//!
//!     client.refresh().await;
//!     client.send("How do I fix a cracked phone screen?").await;
//!
//!     for message in store.messages() {
//!         println!("{:?}: {}", message.role, message.content);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod store;
mod sync;
pub mod transport;

// Re-exports
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use controller::ChatClient;
pub use store::{ConversationStore, StreamPhase};
pub use transport::ChatApi;
