//! Shared HTTP session for both endpoints.
//!
//! Holds one pooled `reqwest::Client` with the configured timeout and
//! user agent, attaches the bearer token, checks the status and decodes
//! JSON. A single attempt is made per request; there is no retry here.

use crate::error::{ClientError, Result};
use follower_core::{ApiConfig, AuthToken};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::Level;

/// Authenticated HTTP session.
pub struct HttpSession {
    client: Client,
    token: AuthToken,
}

impl HttpSession {
    /// Create a session from API settings and a bearer token.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(api: &ApiConfig, token: AuthToken) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .user_agent(api.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, token })
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json(&self, url: &str, description: &str) -> Result<Value> {
        tracing::debug!("Making GET {} to {}", description, url);
        let request = self
            .client
            .get(url)
            .bearer_auth(self.token.expose())
            .header(ACCEPT, "application/json");
        let body = self.execute(request, description).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// POST `payload` as JSON to `url` and decode the reply.
    ///
    /// At debug level the reply body is logged pretty-printed.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: &T,
        description: &str,
    ) -> Result<Value> {
        tracing::debug!("Making POST {} to {}", description, url);
        let request = self
            .client
            .post(url)
            .bearer_auth(self.token.expose())
            .header(CONTENT_TYPE, "application/json")
            .json(payload);
        let body = self.execute(request, description).await?;

        let parsed: Value = serde_json::from_str(&body)?;
        if tracing::enabled!(Level::DEBUG) {
            let pretty = serde_json::to_string_pretty(&parsed).unwrap_or(body);
            tracing::debug!("{} response body:\n{}", description, pretty);
        }
        Ok(parsed)
    }

    async fn execute(&self, request: RequestBuilder, description: &str) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("{} response status: {}", description, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::status(status.as_u16(), &body));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CannedServer;

    fn token() -> AuthToken {
        AuthToken::new("test-token-value").expect("valid token")
    }

    #[test]
    fn test_session_creation() {
        let api = ApiConfig::default();
        let session = HttpSession::new(&api, token()).expect("create session");
        assert_eq!(session.token.prefix(), "test-tok");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let api = ApiConfig {
            timeout_secs: 2,
            ..ApiConfig::default()
        };
        let session = HttpSession::new(&api, token()).expect("create session");

        // Port 9 on localhost is the discard port; nothing listens there in CI.
        let err = session
            .get_json("http://127.0.0.1:9/search", "search for 'x'")
            .await
            .expect_err("request should fail");
        assert!(matches!(
            err,
            ClientError::Connection(_) | ClientError::Network(_) | ClientError::Timeout
        ));
    }

    #[tokio::test]
    async fn test_rate_limit_status_is_reported() {
        let server = CannedServer::start(429, "Too Many Requests").await;
        let session = HttpSession::new(&ApiConfig::default(), token()).expect("create session");

        let err = session
            .get_json(&server.url("/search"), "search for 'x'")
            .await
            .expect_err("429 is an error");
        assert!(err.is_rate_limited());
        assert_eq!(err.to_string(), "HTTP 429: Too Many Requests");
    }

    #[tokio::test]
    async fn test_error_body_is_truncated() {
        const LONG_BODY: &str = concat!(
            "0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789",
            "0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789",
            "0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789",
            "0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789",
            "0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789",
            "0123456789012345678901234567890123456789012345678901234567890123456789012345678901234567890123456789",
        );
        let server = CannedServer::start(500, LONG_BODY).await;
        let session = HttpSession::new(&ApiConfig::default(), token()).expect("create session");

        let err = session
            .post_json(&server.url("/graphql"), &serde_json::json!({}), "follow 'x'")
            .await
            .expect_err("500 is an error");
        let ClientError::Status { status, body } = err else {
            panic!("expected status error");
        };
        assert_eq!(status, 500);
        assert_eq!(body.len(), crate::error::ERROR_BODY_LIMIT + 3);
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = CannedServer::start(200, "not json").await;
        let session = HttpSession::new(&ApiConfig::default(), token()).expect("create session");

        let err = session
            .get_json(&server.url("/search"), "search for 'x'")
            .await
            .expect_err("body is not JSON");
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
