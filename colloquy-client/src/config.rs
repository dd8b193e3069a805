//! Client configuration.

use std::time::Duration;

use reqwest::Client;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Configuration for the chat service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Bearer credential attached to every request.
    pub api_token: Option<String>,
    /// Request timeout; also bounds how long a stalled stream read can hang.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a new config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `{PREFIX}_BASE_URL` and `{PREFIX}_API_TOKEN`; missing variables
    /// fall back to the defaults.
    #[must_use]
    pub fn from_env(prefix: &str) -> Self {
        Self {
            base_url: std::env::var(format!("{prefix}_BASE_URL"))
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_token: std::env::var(format!("{prefix}_API_TOKEN")).ok(),
            timeout: None,
        }
    }

    /// Build an HTTP client with this config.
    #[must_use]
    pub fn build_client(&self) -> Client {
        let mut builder = Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder.build().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = ClientConfig::new()
            .with_base_url("https://chat.example.com/api")
            .with_api_token("tok_123")
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.base_url, "https://chat.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("tok_123"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_from_env_missing_vars_fall_back() {
        let config = ClientConfig::from_env("COLLOQUY_TEST_UNSET");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_token.is_none());
    }
}
