//! The conversation store.
//!
//! Single owner of everything the UI can observe: the conversation list,
//! the active conversation's messages, the transient streaming buffer, the
//! error slot, usage counters, and per-slice loading flags. Mutations are
//! synchronous and total — each method takes the lock once and leaves the
//! state fully updated. Only the controller and read-side sync mutate;
//! observers clone data out through the query methods.

use parking_lot::RwLock;

use colloquy_core::{Conversation, Message, StreamingBuffer, UsageSnapshot};

/// Lifecycle phase of the streaming state machine.
///
/// `Errored` is a transition, not a resting state: a failed transaction
/// lands back in `Idle` with the error slot filled and a synthetic
/// assistant message committed, so "streaming with a bound error" is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamPhase {
    /// No transaction in flight.
    #[default]
    Idle,
    /// Transport opening, no event applied yet.
    Sending,
    /// Events are being applied.
    Streaming,
    /// Byte source exhausted, result being committed.
    Finalizing,
}

#[derive(Debug)]
struct StoreState {
    conversation_id: Option<String>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    buffer: StreamingBuffer,
    phase: StreamPhase,
    error: Option<String>,
    usage: Option<UsageSnapshot>,
    conversations_loading: bool,
    messages_loading: bool,
    usage_loading: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            conversation_id: None,
            conversations: Vec::new(),
            messages: Vec::new(),
            buffer: StreamingBuffer::default(),
            phase: StreamPhase::Idle,
            error: None,
            usage: None,
            // The list is expected to load on mount.
            conversations_loading: true,
            messages_loading: false,
            usage_loading: false,
        }
    }
}

/// Authoritative in-memory conversation state.
#[derive(Debug, Default)]
pub struct ConversationStore {
    inner: RwLock<StoreState>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- queries ----------------------------------------------------------

    /// The active conversation's server identifier, if bound.
    #[must_use]
    pub fn conversation_id(&self) -> Option<String> {
        self.inner.read().conversation_id.clone()
    }

    /// The conversation list.
    #[must_use]
    pub fn conversations(&self) -> Vec<Conversation> {
        self.inner.read().conversations.clone()
    }

    /// The active conversation's committed messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    /// Assistant text streamed so far in the current transaction.
    #[must_use]
    pub fn streaming_content(&self) -> String {
        self.inner.read().buffer.content.clone()
    }

    /// The current progress label, empty once tokens arrive.
    #[must_use]
    pub fn status_message(&self) -> String {
        self.inner.read().buffer.status.clone()
    }

    /// Current phase of the streaming state machine.
    #[must_use]
    pub fn phase(&self) -> StreamPhase {
        self.inner.read().phase
    }

    /// True while a send transaction is in flight.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.inner.read().phase != StreamPhase::Idle
    }

    /// The current user-visible error, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// The last usage snapshot loaded.
    #[must_use]
    pub fn usage(&self) -> Option<UsageSnapshot> {
        self.inner.read().usage
    }

    /// True once the advisory daily token allowance is exhausted.
    #[must_use]
    pub fn is_over_limit(&self) -> bool {
        self.inner
            .read()
            .usage
            .is_some_and(|usage| usage.is_over_daily_limit())
    }

    /// True while the conversation list is loading.
    #[must_use]
    pub fn conversations_loading(&self) -> bool {
        self.inner.read().conversations_loading
    }

    /// True while the active conversation's history is loading.
    #[must_use]
    pub fn messages_loading(&self) -> bool {
        self.inner.read().messages_loading
    }

    /// True while the usage snapshot is loading.
    #[must_use]
    pub fn usage_loading(&self) -> bool {
        self.inner.read().usage_loading
    }

    // ---- streaming transaction mutations ----------------------------------

    /// Single-flight gate: start a send transaction if none is in flight.
    ///
    /// On success the optimistic user message has been appended, the buffer
    /// and error slot are clear, and the phase is `Sending`. Returns `None`
    /// (leaving the state untouched) when a transaction is already active.
    pub fn try_begin_send(&self, text: &str) -> Option<Message> {
        let mut state = self.inner.write();
        if state.phase != StreamPhase::Idle {
            return None;
        }
        state.phase = StreamPhase::Sending;
        state.buffer.clear();
        state.error = None;
        let message = Message::user(text);
        state.messages.push(message.clone());
        Some(message)
    }

    /// Append a user message with a client-generated id. Never fails.
    pub fn append_optimistic_user_message(&self, text: &str) -> Message {
        let message = Message::user(text);
        self.inner.write().messages.push(message.clone());
        message
    }

    /// First event arrived: `Sending` becomes `Streaming`.
    pub fn mark_streaming(&self) {
        let mut state = self.inner.write();
        if state.phase == StreamPhase::Sending {
            state.phase = StreamPhase::Streaming;
        }
    }

    /// Byte source exhausted: the transaction is being committed.
    pub fn begin_finalizing(&self) {
        self.inner.write().phase = StreamPhase::Finalizing;
    }

    /// Replace the transient progress label.
    pub fn set_status(&self, status: &str) {
        self.inner.write().buffer.set_status(status);
    }

    /// Append one streamed chunk to the transient buffer.
    pub fn append_streaming_token(&self, chunk: &str) {
        self.inner.write().buffer.append(chunk);
    }

    /// Commit final assistant text and clear the transient buffer.
    ///
    /// One locked section, so the buffer and the committed message are never
    /// simultaneously non-empty. Resets the phase to `Idle`.
    pub fn commit_assistant_message(&self, text: &str) -> Message {
        let mut state = self.inner.write();
        let message = Message::assistant(text);
        state.messages.push(message.clone());
        state.buffer.clear();
        state.phase = StreamPhase::Idle;
        message
    }

    /// Drop the transient buffer without committing anything.
    ///
    /// Used when a stream ends with no accumulated text, and on
    /// cancellation. Resets the phase to `Idle`.
    pub fn clear_stream(&self) {
        let mut state = self.inner.write();
        state.buffer.clear();
        state.phase = StreamPhase::Idle;
    }

    /// Bind the server-revealed identifier for a previously unbound thread.
    ///
    /// Returns `true` if the id was bound; a no-op returning `false` when an
    /// identifier is already present.
    pub fn bind_conversation_id(&self, id: &str) -> bool {
        let mut state = self.inner.write();
        if state.conversation_id.is_some() {
            return false;
        }
        state.conversation_id = Some(id.to_string());
        true
    }

    // ---- conversation switching and read-side sync ------------------------

    /// Switch the active conversation.
    ///
    /// Clears messages, buffer, and error. When an id is given the caller is
    /// expected to follow up with a history load, so the loading flag is set
    /// here to avoid a flash of the empty state.
    pub fn begin_conversation(&self, id: Option<String>) {
        let mut state = self.inner.write();
        state.messages_loading = id.is_some();
        state.conversation_id = id;
        state.messages.clear();
        state.buffer.clear();
        state.error = None;
    }

    /// Overwrite the user-visible error.
    pub fn record_error(&self, message: &str) {
        self.inner.write().error = Some(message.to_string());
    }

    /// Dismiss the current error.
    pub fn clear_error(&self) {
        self.inner.write().error = None;
    }

    /// Replace the conversation list wholesale and clear its loading flag.
    pub fn set_conversations(&self, conversations: Vec<Conversation>) {
        let mut state = self.inner.write();
        state.conversations = conversations;
        state.conversations_loading = false;
    }

    /// Replace the active conversation's history wholesale and clear its
    /// loading flag.
    pub fn set_messages(&self, messages: Vec<Message>) {
        let mut state = self.inner.write();
        state.messages = messages;
        state.messages_loading = false;
    }

    /// Replace the usage snapshot and clear its loading flag.
    pub fn set_usage(&self, usage: UsageSnapshot) {
        let mut state = self.inner.write();
        state.usage = Some(usage);
        state.usage_loading = false;
    }

    /// Set or clear the conversation-list loading flag.
    pub fn set_conversations_loading(&self, loading: bool) {
        self.inner.write().conversations_loading = loading;
    }

    /// Set or clear the history loading flag.
    pub fn set_messages_loading(&self, loading: bool) {
        self.inner.write().messages_loading = loading;
    }

    /// Set or clear the usage loading flag.
    pub fn set_usage_loading(&self, loading: bool) {
        self.inner.write().usage_loading = loading;
    }

    /// Remove a conversation from the list after a successful delete.
    ///
    /// If it was the active conversation, the active id and messages are
    /// cleared too.
    pub fn remove_conversation(&self, id: &str) {
        let mut state = self.inner.write();
        state.conversations.retain(|c| c.id != id);
        if state.conversation_id.as_deref() == Some(id) {
            state.conversation_id = None;
            state.messages.clear();
        }
    }

    /// Insert a newly created conversation at the front of the list.
    pub fn insert_conversation(&self, conversation: Conversation) {
        self.inner.write().conversations.insert(0, conversation);
    }
}
