use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{ApiError, TokenGrant, TokenSource};
use crate::infrastructure::http::{HttpTransport, TransportRequest, error_message};

/// Credential endpoint payload: `{ token, expiresIn }`
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
    #[serde(rename = "expiresIn", alias = "expires_in")]
    expires_in: Option<u64>,
}

/// Token source backed by `GET {base}/auth/token`
#[derive(Debug)]
pub struct HttpTokenSource {
    transport: Arc<dyn HttpTransport>,
    url: String,
    default_ttl: Duration,
    timeout: Duration,
}

impl HttpTokenSource {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        base_url: &str,
        endpoint: &str,
        default_ttl: Duration,
    ) -> Self {
        Self {
            transport,
            url: format!("{}{}", base_url.trim_end_matches('/'), endpoint),
            default_ttl,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenSource for HttpTokenSource {
    async fn fetch_token(&self) -> Result<TokenGrant, ApiError> {
        let mut request = TransportRequest::get(&self.url);
        request
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));

        let response = tokio::time::timeout(self.timeout, self.transport.send(request))
            .await
            .map_err(|_| ApiError::timeout(format!("Credential endpoint {} timed out", self.url)))?
            .map_err(|e| ApiError::network(format!("Credential endpoint unreachable: {}", e)))?;

        if !response.is_success() {
            // No session (guest) lands here; the cache treats it as "no credential"
            return Err(ApiError::auth(format!(
                "Failed to fetch auth token: {}",
                error_message(&response)
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::validation(format!("Malformed token response: {}", e)))?;

        if parsed.token.is_empty() {
            return Err(ApiError::validation("Credential endpoint returned an empty token"));
        }

        let expires_in = parsed
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(self.default_ttl);

        Ok(TokenGrant::new(parsed.token, expires_in))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
