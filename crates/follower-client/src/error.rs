//! Error types for the HTTP layer.
//!
//! These never cross the `search`/`follow` contracts; they are logged and
//! converted to [`SearchOutcome::Failed`](crate::api::SearchOutcome) or
//! [`FollowOutcome::NetworkFailure`](follower_core::FollowOutcome).

use thiserror::Error;

/// Maximum number of body characters kept in a [`ClientError::Status`].
pub const ERROR_BODY_LIMIT: usize = 500;

/// Errors that can occur while talking to the remote endpoints.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Could not connect to the remote host
    #[error("connection error: {0}")]
    Connection(String),

    /// Remote returned a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Other transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Response body was not valid JSON
    #[error("failed to decode JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Internal error (client construction, request encoding)
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Check if the remote signalled HTTP 429.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Status { status: 429, .. })
    }

    /// Build a status error, truncating the body.
    #[must_use]
    pub fn status(status: u16, body: &str) -> Self {
        let body = match body.char_indices().nth(ERROR_BODY_LIMIT) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        Self::Status { status, body }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Status {
            status: 429,
            body: "Too Many Requests".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: Too Many Requests");
        assert!(err.is_rate_limited());

        let err = ClientError::Timeout;
        assert_eq!(err.to_string(), "request timed out");
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_status_body_truncated() {
        let long = "x".repeat(ERROR_BODY_LIMIT + 50);
        let ClientError::Status { body, .. } = ClientError::status(500, &long) else {
            panic!("expected status error");
        };
        assert_eq!(body.len(), ERROR_BODY_LIMIT + 3);
        assert!(body.ends_with("..."));

        let ClientError::Status { body, .. } = ClientError::status(502, "bad gateway") else {
            panic!("expected status error");
        };
        assert_eq!(body, "bad gateway");
    }
}
