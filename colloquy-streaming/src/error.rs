//! Streaming errors.

use thiserror::Error;

/// Errors that can occur while decoding a stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying byte source failed mid-stream.
    #[error("connection error: {0}")]
    Connection(String),

    /// The carry buffer grew past the allowed maximum without a line break.
    #[error("decode buffer exceeded maximum size")]
    BufferOverflow,
}

impl StreamError {
    /// Create a connection error from any displayable source error.
    pub fn connection<E: std::fmt::Display>(err: E) -> Self {
        Self::Connection(err.to_string())
    }
}

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StreamError::connection("reset by peer");
        assert_eq!(err.to_string(), "connection error: reset by peer");
    }
}
