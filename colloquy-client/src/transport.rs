//! HTTP transport for the chat service.
//!
//! One request per operation; the streaming endpoint hands back the raw
//! byte stream of the response body and nothing else — applying events to
//! state is the controller's job, not the transport's.

use bytes::Bytes;
use futures::Stream;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use colloquy_core::{ClientError, Conversation, Message, Result, UsageSnapshot};

use crate::config::ClientConfig;

/// Bearer-authenticated client for the chat service endpoints.
#[derive(Debug, Clone)]
pub struct ChatApi {
    client: Client,
    config: ClientConfig,
}

#[derive(Debug, Deserialize)]
struct ConversationsEnvelope {
    #[serde(default)]
    conversations: Vec<Conversation>,
}

#[derive(Debug, Deserialize)]
struct MessagesEnvelope {
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct CreateConversationBody<'a> {
    title: &'a str,
}

impl ChatApi {
    /// Create a transport from configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: config.build_client(),
            config,
        }
    }

    /// The configuration this transport was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Open the streaming endpoint for one send-message transaction.
    ///
    /// Attaches the message and, when known, the conversation identifier as
    /// query parameters; when no identifier is sent the server creates a new
    /// conversation and reports its id in the terminal `done` event.
    pub async fn open_stream(
        &self,
        message: &str,
        conversation_id: Option<&str>,
    ) -> Result<impl Stream<Item = std::result::Result<Bytes, reqwest::Error>>> {
        let mut query: Vec<(&str, &str)> = vec![("message", message)];
        if let Some(id) = conversation_id {
            query.push(("conversationId", id));
        }

        let response = self
            .authorize(self.client.get(self.url("/chat/stream")).query(&query))
            .send()
            .await
            .map_err(|e| ClientError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::connection(format!(
                "stream request failed with status {status}"
            )));
        }

        Ok(response.bytes_stream())
    }

    /// List the user's conversations.
    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        let envelope: ConversationsEnvelope = self.get_json("/user/conversations").await?;
        Ok(envelope.conversations)
    }

    /// Fetch one conversation's message history.
    pub async fn conversation_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let envelope: MessagesEnvelope = self
            .get_json(&format!("/chat/conversations/{conversation_id}"))
            .await?;
        Ok(envelope.messages)
    }

    /// Create a conversation with an explicit title.
    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let response = self
            .authorize(self.client.post(self.url("/chat/conversations")))
            .json(&CreateConversationBody { title })
            .send()
            .await
            .map_err(|e| ClientError::read_sync(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::read_sync(format!(
                "create conversation returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::read_sync(e.to_string()))
    }

    /// Delete a conversation.
    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        let response = self
            .authorize(
                self.client
                    .delete(self.url(&format!("/chat/conversations/{conversation_id}"))),
            )
            .send()
            .await
            .map_err(|e| ClientError::read_sync(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::read_sync(format!(
                "delete conversation returned status {status}"
            )));
        }
        Ok(())
    }

    /// Fetch the user's usage counters.
    pub async fn usage(&self) -> Result<UsageSnapshot> {
        self.get_json("/user/usage").await
    }

    /// Fetch the user's profile, pass-through.
    pub async fn profile(&self) -> Result<serde_json::Value> {
        self.get_json("/user/profile").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await
            .map_err(|e| ClientError::read_sync(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::read_sync(format!(
                "{path} returned status {status}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::read_sync(e.to_string()))
    }
}
