//! Chat error types

use thiserror::Error;

/// Errors raised while exchanging a message with the assistant service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// The endpoint answered with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The request never reached the endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// The response body failed mid-stream
    #[error("Failed to read response body: {0}")]
    Body(String),

    /// A `data: ` line did not carry a valid JSON payload
    #[error("Malformed stream line: {0}")]
    Decode(String),

    /// Another exchange is still streaming
    #[error("A reply is already streaming")]
    Busy,
}

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ChatError::Status(502).to_string(), "HTTP error! status: 502");
        assert_eq!(
            ChatError::Network("connection refused".to_string()).to_string(),
            "Network error: connection refused"
        );
    }
}
