//! The stream controller.
//!
//! Orchestrates one send-message transaction end to end: append the
//! optimistic user message, open the transport, pump decoded events into
//! the store, then finalize or synthesize a failure message. At most one
//! transaction is in flight per client; the gate is the store's phase,
//! checked and set in one locked section.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use colloquy_core::{ClientError, Conversation, FailureKind, Result};
use colloquy_streaming::{EventStream, StreamEvent};

use crate::config::ClientConfig;
use crate::store::ConversationStore;
use crate::sync;
use crate::transport::ChatApi;

/// How a completed streaming loop ended.
enum StreamOutcome {
    /// The byte source finished; carries the accumulated assistant text.
    Completed(String),
    /// The transaction was cancelled cooperatively.
    Cancelled,
}

/// The outward interface of the conversation client.
///
/// Cheap to clone; clones share the same store and transport. Observers
/// read through [`store`](Self::store), every action is a method here.
#[derive(Clone)]
pub struct ChatClient {
    api: ChatApi,
    store: Arc<ConversationStore>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl ChatClient {
    /// Create a client from configuration, with a fresh store.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            api: ChatApi::new(config),
            store: Arc::new(ConversationStore::new()),
            cancel: Arc::new(Mutex::new(CancellationToken::new())),
        }
    }

    /// Shared handle to the observable conversation state.
    #[must_use]
    pub fn store(&self) -> Arc<ConversationStore> {
        Arc::clone(&self.store)
    }

    /// Send a message on the active conversation and stream the reply.
    ///
    /// Single-flight: while a transaction is in flight, further calls are
    /// logged no-ops. All failures are absorbed into the store — the error
    /// slot plus a synthetic assistant message — so this never returns an
    /// error and the optimistic user message is always retained.
    pub async fn send(&self, text: &str) {
        if self.store.try_begin_send(text).is_none() {
            warn!("send rejected: a stream is already in flight");
            return;
        }

        let cancel = self.fresh_cancel_token();
        match self.run_stream(text, &cancel).await {
            Ok(StreamOutcome::Completed(response)) => {
                self.store.begin_finalizing();
                if response.trim().is_empty() {
                    self.store.clear_stream();
                } else {
                    self.store.commit_assistant_message(&response);
                }
            }
            Ok(StreamOutcome::Cancelled) => {
                debug!("stream transaction cancelled");
                self.store.clear_stream();
            }
            Err(err) => {
                let raw = err.slot_message();
                error!(error = %err, "stream transaction failed");
                self.store.record_error(&raw);
                let notice = FailureKind::classify(&raw).assistant_text(&raw);
                self.store.commit_assistant_message(&notice);
            }
        }
    }

    /// Drive one transaction's event loop.
    async fn run_stream(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<StreamOutcome> {
        let conversation_id = self.store.conversation_id();

        let bytes = tokio::select! {
            _ = cancel.cancelled() => return Ok(StreamOutcome::Cancelled),
            opened = self.api.open_stream(text, conversation_id.as_deref()) => opened?,
        };

        let mut events = Box::pin(EventStream::new(bytes));
        let mut response = String::new();
        let mut done_seen = false;
        let mut started = false;

        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Ok(StreamOutcome::Cancelled),
                next = events.next() => next,
            };
            let Some(item) = next else { break };
            let event = item.map_err(|e| ClientError::connection(e.to_string()))?;

            if !started {
                self.store.mark_streaming();
                started = true;
            }

            match event {
                StreamEvent::Status { message } => self.store.set_status(&message),
                StreamEvent::Token { content } => {
                    if done_seen {
                        debug!("ignoring token after done");
                        continue;
                    }
                    self.store.set_status("");
                    response.push_str(&content);
                    self.store.append_streaming_token(&content);
                }
                StreamEvent::Done { conversation_id } => {
                    done_seen = true;
                    if let Some(id) = conversation_id {
                        if self.store.bind_conversation_id(&id) {
                            debug!(conversation_id = %id, "bound new conversation id");
                        }
                    }
                    // The list's title/last-updated changed server-side;
                    // refresh without blocking finalization.
                    self.spawn_conversations_refresh();
                }
                StreamEvent::Error { message, details } => {
                    return Err(ClientError::server_reported(message, details));
                }
            }
        }

        Ok(StreamOutcome::Completed(response))
    }

    /// Switch the active conversation, cancelling any in-flight stream.
    ///
    /// `None` starts a fresh, not-yet-created thread; `Some(id)` loads that
    /// conversation's history.
    pub async fn select_conversation(&self, id: Option<&str>) {
        self.cancel();
        self.store.begin_conversation(id.map(str::to_owned));
        if let Some(id) = id {
            sync::load_conversation(&self.api, &self.store, id).await;
        }
    }

    /// Delete a conversation and drop it from local state.
    pub async fn delete_conversation(&self, id: &str) {
        match self.api.delete_conversation(id).await {
            Ok(()) => self.store.remove_conversation(id),
            Err(err) => {
                warn!(conversation_id = id, error = %err, "failed to delete conversation");
                self.store.record_error(&err.slot_message());
            }
        }
    }

    /// Reload the conversation list and usage counters.
    pub async fn refresh(&self) {
        futures::join!(
            sync::load_conversations(&self.api, &self.store),
            sync::load_usage(&self.api, &self.store),
        );
    }

    /// Reload the conversation list.
    pub async fn load_conversations(&self) {
        sync::load_conversations(&self.api, &self.store).await;
    }

    /// Reload one conversation's history.
    pub async fn load_conversation(&self, id: &str) {
        sync::load_conversation(&self.api, &self.store, id).await;
    }

    /// Reload the usage snapshot.
    pub async fn load_usage(&self) {
        sync::load_usage(&self.api, &self.store).await;
    }

    /// Create a conversation with an explicit title and add it to the list.
    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let conversation = self.api.create_conversation(title).await?;
        self.store.insert_conversation(conversation.clone());
        Ok(conversation)
    }

    /// Fetch the user's profile, pass-through.
    pub async fn fetch_profile(&self) -> Result<serde_json::Value> {
        self.api.profile().await
    }

    /// Dismiss the current user-visible error.
    pub fn clear_error(&self) {
        self.store.clear_error();
    }

    /// Cancel the in-flight transaction, if any.
    ///
    /// The cancelled transaction clears its transient buffer, keeps the
    /// optimistic user message, and records no error.
    pub fn cancel(&self) {
        self.cancel.lock().cancel();
    }

    fn fresh_cancel_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.cancel.lock() = token.clone();
        token
    }

    fn spawn_conversations_refresh(&self) {
        let api = self.api.clone();
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            sync::load_conversations(&api, &store).await;
        });
    }
}
