//! Minimal streaming chat session.
//!
//! Sends one message and prints the conversation once the stream settles.
//!
//! Run with:
//! ```bash
//! COLLOQUY_BASE_URL=http://localhost:5000/api \
//! COLLOQUY_API_TOKEN=your-token \
//! cargo run --example stream_chat
//! ```

use colloquy::prelude::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let client = ChatClient::new(ClientConfig::from_env("COLLOQUY"));
    let store = client.store();

    client.refresh().await;
    println!(
        "{} conversations, daily tokens used: {}",
        store.conversations().len(),
        store.usage().map_or(0, |u| u.daily_tokens),
    );

    client.send("How do I replace a cracked phone screen?").await;

    if let Some(error) = store.error() {
        eprintln!("stream failed: {error}");
    }

    for message in store.messages() {
        let who = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("{who}: {}", message.content);
    }

    if let Some(id) = store.conversation_id() {
        println!("(conversation {id})");
    }
}
