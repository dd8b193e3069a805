//! Read-side sync.
//!
//! Loads the conversation list, one conversation's history, and the usage
//! snapshot from the non-streaming endpoints, overwriting the matching
//! store slice wholesale on success. Failures land in the shared error
//! slot; nothing here touches an in-flight streaming transaction.

use tracing::warn;

use crate::store::ConversationStore;
use crate::transport::ChatApi;

/// Reload the conversation list.
pub(crate) async fn load_conversations(api: &ChatApi, store: &ConversationStore) {
    store.set_conversations_loading(true);
    match api.conversations().await {
        Ok(conversations) => store.set_conversations(conversations),
        Err(err) => {
            warn!(error = %err, "failed to load conversations");
            store.record_error(&err.slot_message());
            store.set_conversations_loading(false);
        }
    }
}

/// Reload one conversation's message history.
///
/// Must not race a stream on the same conversation; the controller
/// serializes by cancelling any in-flight transaction before switching.
pub(crate) async fn load_conversation(api: &ChatApi, store: &ConversationStore, id: &str) {
    store.set_messages_loading(true);
    match api.conversation_messages(id).await {
        Ok(messages) => store.set_messages(messages),
        Err(err) => {
            warn!(conversation_id = id, error = %err, "failed to load conversation history");
            store.record_error(&err.slot_message());
            store.set_messages_loading(false);
        }
    }
}

/// Reload the usage snapshot.
pub(crate) async fn load_usage(api: &ChatApi, store: &ConversationStore) {
    store.set_usage_loading(true);
    match api.usage().await {
        Ok(usage) => store.set_usage(usage),
        Err(err) => {
            warn!(error = %err, "failed to load usage");
            store.record_error(&err.slot_message());
            store.set_usage_loading(false);
        }
    }
}
