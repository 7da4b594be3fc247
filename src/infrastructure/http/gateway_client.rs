//! Hardened network-call wrapper
//!
//! Attaches the cached credential, bounds every call with a timeout,
//! classifies failures into `ApiError` and owns the two bounded retry paths:
//! one re-authenticated retry after 401/403, and one anonymous retry after a
//! failure with no response at all.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use super::request::{Access, RequestOptions};
use super::transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};
use crate::config::{DEFAULT_BASE_URL, GatewayConfig};
use crate::domain::{ApiCallMetrics, ApiError, Credential, MetricsSink};
use crate::infrastructure::auth::TokenCache;

/// Error body shape: `{ message?, detail? }`
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

/// Human-readable message for a non-success response
pub fn error_message(response: &TransportResponse) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&response.body) {
        if let Some(message) = body.message.filter(|m| !m.is_empty()) {
            return message;
        }
        match body.detail {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => return detail,
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }

    let text = response.body.trim();
    if !text.is_empty() && !text.starts_with('{') {
        return text.to_string();
    }

    format!("HTTP {}: {}", response.status, response.reason)
}

fn classify_status(response: &TransportResponse) -> ApiError {
    let message = error_message(response);
    match response.status {
        401 | 403 => ApiError::auth(message),
        status if status >= 500 => ApiError::server(status, message),
        status => ApiError::client(status, message),
    }
}

fn is_auth_failure(status: u16) -> bool {
    matches!(status, 401 | 403)
}

fn origin_of(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .map(|u| u.origin().ascii_serialization())
}

enum SendFailure {
    TimedOut,
    Transport(TransportError),
}

struct CallOutcome {
    status: u16,
    result: Result<serde_json::Value, ApiError>,
}

impl CallOutcome {
    fn ok(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            result: Ok(value),
        }
    }

    fn failed(status: u16, error: ApiError) -> Self {
        Self {
            status,
            result: Err(error),
        }
    }
}

/// Authenticated gateway to the backend API
pub struct GatewayClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<TokenCache>,
    metrics: Arc<dyn MetricsSink>,
    timeout: Duration,
    app_origin: Option<String>,
    cors_fast_fail: Duration,
    anonymous_origins: Mutex<HashSet<String>>,
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("app_origin", &self.app_origin)
            .finish()
    }
}

impl GatewayClient {
    pub fn new(
        config: &GatewayConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<TokenCache>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        if !config.is_base_url_configured() {
            tracing::warn!(
                default = DEFAULT_BASE_URL,
                "Gateway base URL is not configured (set APP__GATEWAY__BASE_URL), using default"
            );
        }

        Self {
            base_url: config.resolved_base_url(),
            transport,
            tokens,
            metrics,
            timeout: config.timeout(),
            app_origin: config.app_origin.as_deref().and_then(origin_of),
            cors_fast_fail: config.cors_fast_fail(),
            anonymous_origins: Mutex::new(HashSet::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// Call `endpoint` and decode the JSON body into `T`
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let started = Instant::now();
        // Credential fetch, both retry paths and every attempt share one deadline
        let outcome =
            match tokio::time::timeout(self.timeout, self.execute(endpoint, &options)).await {
                Ok(outcome) => outcome,
                Err(_) => self.call_timed_out(endpoint),
            };

        let result = outcome.result.and_then(|value| {
            serde_json::from_value::<T>(value).map_err(|e| {
                ApiError::validation(format!("Unexpected response shape from {}: {}", endpoint, e))
            })
        });

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut record = ApiCallMetrics::new(endpoint, duration_ms, outcome.status);

        match &result {
            Ok(_) => {
                tracing::debug!(endpoint, status = outcome.status, duration_ms, "Gateway call succeeded");
            }
            Err(e) => {
                tracing::warn!(
                    endpoint,
                    status = outcome.status,
                    duration_ms,
                    kind = %e.kind(),
                    retryable = e.retryable(),
                    error = %e,
                    "Gateway call failed"
                );
                record = record.with_error(e.to_string());
            }
        }

        self.metrics.record(record);
        result
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::get()).await
    }

    async fn execute(&self, endpoint: &str, options: &RequestOptions) -> CallOutcome {
        let url = self.url_for(endpoint);
        let credential = self.tokens.get_token().await;

        if options.access == Access::Protected && credential.is_none() {
            return CallOutcome::failed(
                0,
                ApiError::auth(format!("No credential available for protected endpoint {}", endpoint)),
            );
        }

        let started = Instant::now();
        match self.send(&url, options, credential.as_ref()).await {
            Ok(response) if is_auth_failure(response.status) => {
                self.retry_with_fresh_credential(&url, options, response).await
            }
            Ok(response) => self.finish(&url, options, response, credential.is_none()),
            Err(SendFailure::TimedOut) => self.timed_out(&url),
            Err(SendFailure::Transport(error)) => {
                self.retry_without_credential(
                    &url,
                    options,
                    credential.is_some(),
                    started.elapsed(),
                    error,
                )
                .await
            }
        }
    }

    async fn retry_with_fresh_credential(
        &self,
        url: &str,
        options: &RequestOptions,
        rejected: TransportResponse,
    ) -> CallOutcome {
        tracing::info!(url, status = rejected.status, "Credential rejected, refreshing and retrying once");

        self.tokens.invalidate().await;
        let refreshed = self.tokens.get_token().await;

        if options.access == Access::Protected && refreshed.is_none() {
            return CallOutcome::failed(rejected.status, ApiError::auth(error_message(&rejected)));
        }

        match self.send(url, options, refreshed.as_ref()).await {
            Ok(response) if is_auth_failure(response.status) => {
                CallOutcome::failed(response.status, ApiError::auth(error_message(&response)))
            }
            Ok(response) => self.finish(url, options, response, refreshed.is_none()),
            Err(SendFailure::TimedOut) => self.timed_out(url),
            Err(SendFailure::Transport(error)) => {
                CallOutcome::failed(0, ApiError::network(format!("{}: {}", url, error)))
            }
        }
    }

    async fn retry_without_credential(
        &self,
        url: &str,
        options: &RequestOptions,
        had_credential: bool,
        first_attempt: Duration,
        first_error: TransportError,
    ) -> CallOutcome {
        tracing::info!(url, error = %first_error, "No response, retrying once without credentials");

        match self.send(url, options, None).await {
            Ok(response) => self.finish(url, options, response, true),
            Err(SendFailure::TimedOut) => self.timed_out(url),
            Err(SendFailure::Transport(error)) => {
                let looks_like_cors = had_credential
                    && first_attempt <= self.cors_fast_fail
                    && self.is_cross_origin(url)
                    && self.had_anonymous_success(url);

                if looks_like_cors {
                    CallOutcome::failed(
                        0,
                        ApiError::cors(format!(
                            "{} rejected the credentialed request but has served anonymous ones; \
                             the backend must allow this origin: {}",
                            url, error
                        )),
                    )
                } else {
                    CallOutcome::failed(0, ApiError::network(format!("{}: {}", url, error)))
                }
            }
        }
    }

    fn finish(
        &self,
        url: &str,
        options: &RequestOptions,
        response: TransportResponse,
        anonymous: bool,
    ) -> CallOutcome {
        if !response.is_success() {
            return CallOutcome::failed(response.status, classify_status(&response));
        }

        if anonymous {
            self.remember_anonymous_success(url);
        }

        let body = response.body.trim();
        let value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            match serde_json::from_str(body) {
                Ok(value) => value,
                Err(e) => {
                    return CallOutcome::failed(
                        response.status,
                        ApiError::validation(format!("Response from {} is not valid JSON: {}", url, e)),
                    );
                }
            }
        };

        if let Some(validator) = &options.validator {
            if let Err(reason) = validator(&value) {
                return CallOutcome::failed(
                    response.status,
                    ApiError::validation(format!("Response from {} failed validation: {}", url, reason)),
                );
            }
        }

        CallOutcome::ok(response.status, value)
    }

    fn timed_out(&self, url: &str) -> CallOutcome {
        CallOutcome::failed(
            0,
            ApiError::timeout(format!(
                "No response from {} within {}s",
                url,
                self.timeout.as_secs()
            )),
        )
    }

    fn call_timed_out(&self, endpoint: &str) -> CallOutcome {
        CallOutcome::failed(
            0,
            ApiError::timeout(format!(
                "{} did not complete within {}s",
                endpoint,
                self.timeout.as_secs()
            )),
        )
    }

    async fn send(
        &self,
        url: &str,
        options: &RequestOptions,
        credential: Option<&Credential>,
    ) -> Result<TransportResponse, SendFailure> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        headers.extend(options.headers.iter().cloned());

        if let Some(credential) = credential {
            headers.push(("Authorization".to_string(), credential.authorization_header()));
        }

        let request = TransportRequest {
            method: options.method,
            url: url.to_string(),
            query: options.query.clone(),
            headers,
            body: options.body.clone(),
        };

        tracing::debug!(
            method = %request.method,
            url,
            authenticated = credential.is_some(),
            "Sending gateway request"
        );

        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Err(_) => Err(SendFailure::TimedOut),
            Ok(Err(TransportError::Timeout(_))) => Err(SendFailure::TimedOut),
            Ok(Err(error)) => Err(SendFailure::Transport(error)),
            Ok(Ok(response)) => Ok(response),
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }

        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn is_cross_origin(&self, url: &str) -> bool {
        match (&self.app_origin, origin_of(url)) {
            (Some(app), Some(target)) => *app != target,
            _ => true,
        }
    }

    fn remember_anonymous_success(&self, url: &str) {
        if let Some(origin) = origin_of(url) {
            self.anonymous_origins
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(origin);
        }
    }

    fn had_anonymous_success(&self, url: &str) -> bool {
        origin_of(url).is_some_and(|origin| {
            self.anonymous_origins
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .contains(&origin)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::mock::MockTokenSource;
    use crate::domain::metrics::MockMetricsSink;
    use crate::domain::{ApiErrorKind, NoopMetricsSink};
    use crate::infrastructure::http::mock::MockTransport;
    use serde_json::{Value, json};

    struct Harness {
        client: GatewayClient,
        transport: Arc<MockTransport>,
        tokens: Arc<MockTokenSource>,
    }

    fn harness_with(
        transport: MockTransport,
        tokens: MockTokenSource,
        config: GatewayConfig,
        metrics: Arc<dyn MetricsSink>,
    ) -> Harness {
        let transport = Arc::new(transport);
        let tokens = Arc::new(tokens);
        let cache = Arc::new(TokenCache::new(tokens.clone()));
        let client = GatewayClient::new(&config, transport.clone(), cache, metrics);

        Harness {
            client,
            transport,
            tokens,
        }
    }

    fn harness(transport: MockTransport, tokens: MockTokenSource) -> Harness {
        harness_with(
            transport,
            tokens,
            GatewayConfig::default().with_base_url("https://api.example.com"),
            Arc::new(NoopMetricsSink),
        )
    }

    #[tokio::test]
    async fn test_success_attaches_bearer_token() {
        let h = harness(
            MockTransport::new().respond(200, json!({ "results": [] })),
            MockTokenSource::new(),
        );

        let body: Value = h
            .client
            .request("/api/v1/search", RequestOptions::get().query("q", "mri"))
            .await
            .unwrap();

        assert_eq!(body, json!({ "results": [] }));
        let request = &h.transport.requests()[0];
        assert_eq!(request.url, "https://api.example.com/api/v1/search");
        assert_eq!(request.header("Authorization"), Some("Bearer token-1"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.query, vec![("q".to_string(), "mri".to_string())]);
    }

    #[tokio::test]
    async fn test_public_call_without_credential_proceeds_anonymously() {
        let h = harness(
            MockTransport::new().respond(200, json!(["ok"])),
            MockTokenSource::new().failing(),
        );

        let body: Vec<String> = h.client.get("/api/v1/categories").await.unwrap();

        assert_eq!(body, vec!["ok".to_string()]);
        assert_eq!(h.transport.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_protected_call_without_credential_is_auth_error() {
        let h = harness(MockTransport::new(), MockTokenSource::new().failing());

        let error = h
            .client
            .request::<Value>("/api/v1/bookings", RequestOptions::get().protected())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Auth);
        assert!(!error.retryable());
        assert_eq!(h.transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_refreshes_and_retries_once() {
        let h = harness(
            MockTransport::new()
                .respond(401, json!({ "detail": "token expired" }))
                .respond(200, json!({ "ok": true })),
            MockTokenSource::new(),
        );

        let body: Value = h.client.get("/api/v1/procedures/brain-mri").await.unwrap();

        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(h.tokens.calls(), 2);
        let requests = h.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].header("Authorization"), Some("Bearer token-1"));
        assert_eq!(requests[1].header("Authorization"), Some("Bearer token-2"));
    }

    #[tokio::test]
    async fn test_second_rejection_is_terminal_auth_error() {
        let h = harness(
            MockTransport::new()
                .respond(403, json!({ "message": "forbidden" }))
                .respond(403, json!({ "message": "still forbidden" })),
            MockTokenSource::new(),
        );

        let error = h.client.get::<Value>("/api/v1/me").await.unwrap_err();

        assert_eq!(error, ApiError::auth("still forbidden"));
        assert!(!error.retryable());
        assert_eq!(h.transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let h = harness(
            MockTransport::new().respond(503, json!({ "detail": "database warming up" })),
            MockTokenSource::new(),
        );

        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error, ApiError::server(503, "database warming up"));
        assert!(error.retryable());
        assert_eq!(h.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_client_error_uses_text_body_or_status_line() {
        let h = harness(
            MockTransport::new()
                .respond_text(404, "procedure not found")
                .respond_text(422, ""),
            MockTokenSource::new(),
        );

        let first = h.client.get::<Value>("/api/v1/procedures/x").await.unwrap_err();
        let second = h.client.get::<Value>("/api/v1/procedures/y").await.unwrap_err();

        assert_eq!(first, ApiError::client(404, "procedure not found"));
        assert_eq!(second, ApiError::client(422, "HTTP 422: Unprocessable Entity"));
    }

    #[tokio::test]
    async fn test_network_failure_recovers_with_anonymous_retry() {
        let h = harness(
            MockTransport::new()
                .fail(TransportError::Connect("preflight rejected".to_string()))
                .respond(200, json!({ "categories": [] })),
            MockTokenSource::new(),
        );

        let body: Value = h.client.get("/api/v1/categories").await.unwrap();

        assert_eq!(body, json!({ "categories": [] }));
        let requests = h.transport.requests();
        assert_eq!(requests[0].header("Authorization"), Some("Bearer token-1"));
        assert_eq!(requests[1].header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_network_failure_without_history_is_network_error() {
        let h = harness(
            MockTransport::new()
                .fail(TransportError::Connect("refused".to_string()))
                .fail(TransportError::Connect("refused".to_string())),
            MockTokenSource::new(),
        );

        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Network);
        assert!(error.retryable());
        assert_eq!(h.transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_credentialed_failure_after_anonymous_success_is_cors() {
        let h = harness(
            MockTransport::new()
                .fail(TransportError::Other("blocked".to_string()))
                .respond(200, json!([]))
                .fail(TransportError::Other("blocked".to_string()))
                .fail(TransportError::Other("blocked".to_string())),
            MockTokenSource::new(),
        );

        let _: Value = h.client.get("/api/v1/categories").await.unwrap();
        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Cors);
        assert!(error.retryable());
        assert_eq!(h.transport.request_count(), 4);
    }

    #[tokio::test]
    async fn test_same_origin_failure_is_never_cors() {
        let h = harness_with(
            MockTransport::new()
                .fail(TransportError::Other("blocked".to_string()))
                .respond(200, json!([]))
                .fail(TransportError::Other("blocked".to_string()))
                .fail(TransportError::Other("blocked".to_string())),
            MockTokenSource::new(),
            GatewayConfig {
                app_origin: Some("https://api.example.com".to_string()),
                ..GatewayConfig::default().with_base_url("https://api.example.com")
            },
            Arc::new(NoopMetricsSink),
        );

        let _: Value = h.client.get("/api/v1/categories").await.unwrap();
        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Network);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_credentialed_failure_is_network_error() {
        let h = harness(
            MockTransport::new()
                .fail(TransportError::Other("blocked".to_string()))
                .respond(200, json!([]))
                .fail_after(Duration::from_secs(2), TransportError::Other("reset".to_string()))
                .fail(TransportError::Other("reset".to_string())),
            MockTokenSource::new(),
        );

        let _: Value = h.client.get("/api/v1/categories").await.unwrap();
        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Network);
        assert_eq!(h.transport.request_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_credentialed_failure_inside_window_is_cors() {
        let h = harness(
            MockTransport::new()
                .fail(TransportError::Other("blocked".to_string()))
                .respond(200, json!([]))
                .fail_after(Duration::from_millis(1000), TransportError::Other("blocked".to_string()))
                .fail(TransportError::Other("blocked".to_string())),
            MockTokenSource::new(),
        );

        let _: Value = h.client.get("/api/v1/categories").await.unwrap();
        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Cors);
    }

    #[tokio::test(start_paused = true)]
    async fn test_anonymous_first_attempt_failure_is_network_error() {
        let h = harness(
            MockTransport::new()
                .respond(200, json!([]))
                .fail(TransportError::Other("blocked".to_string()))
                .fail(TransportError::Other("blocked".to_string())),
            MockTokenSource::new().failing(),
        );

        let _: Value = h.client.get("/api/v1/categories").await.unwrap();
        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Network);
        assert!(
            h.transport
                .requests()
                .iter()
                .all(|r| r.headers.iter().all(|(name, _)| name != "Authorization"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_whole_call_including_refresh() {
        let h = harness(
            MockTransport::new().respond(401, json!({})).hang(),
            MockTokenSource::new().with_delay(Duration::from_secs(25)),
        );

        let started = Instant::now();
        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(error.kind(), ApiErrorKind::Timeout);
        assert!(elapsed <= Duration::from_secs(30), "call took {:?}", elapsed);
        assert_eq!(h.tokens.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retryable_and_not_retried() {
        let h = harness(MockTransport::new().hang(), MockTokenSource::new());

        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(error.kind(), ApiErrorKind::Timeout);
        assert!(error.retryable());
        assert_eq!(h.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_validator_and_malformed_body_are_validation_errors() {
        let h = harness(
            MockTransport::new()
                .respond(200, json!({ "items": [] }))
                .respond_text(200, "<html>oops</html>"),
            MockTokenSource::new(),
        );

        let options = RequestOptions::get().validate(|value| {
            value
                .get("results")
                .map(|_| ())
                .ok_or_else(|| "missing results".to_string())
        });
        let rejected = h
            .client
            .request::<Value>("/api/v1/search", options)
            .await
            .unwrap_err();
        let malformed = h.client.get::<Value>("/api/v1/search").await.unwrap_err();

        assert_eq!(rejected.kind(), ApiErrorKind::Validation);
        assert!(!rejected.retryable());
        assert_eq!(malformed.kind(), ApiErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_empty_result_list_is_success_not_error() {
        let h = harness(MockTransport::new().respond(200, json!([])), MockTokenSource::new());

        let items: Vec<Value> = h.client.get("/api/v1/search").await.unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_validation_error() {
        #[derive(Debug, serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            results: Vec<String>,
        }

        let h = harness(
            MockTransport::new().respond(200, json!({ "results": 42 })),
            MockTokenSource::new(),
        );

        let error = h.client.get::<Expected>("/api/v1/search").await.unwrap_err();
        assert_eq!(error.kind(), ApiErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_each_call_emits_one_metrics_record() {
        let mut sink = MockMetricsSink::new();
        sink.expect_record()
            .withf(|m| m.endpoint == "/api/v1/search" && m.status == 500 && m.error.is_some())
            .times(1)
            .return_const(());

        let h = harness_with(
            MockTransport::new().respond(500, json!({})),
            MockTokenSource::new(),
            GatewayConfig::default().with_base_url("https://api.example.com"),
            Arc::new(sink),
        );

        let error = h.client.get::<Value>("/api/v1/search").await.unwrap_err();
        assert_eq!(error, ApiError::server(500, "HTTP 500: Internal Server Error"));
    }

    #[test]
    fn test_missing_base_url_uses_default() {
        let transport = Arc::new(MockTransport::new());
        let cache = Arc::new(TokenCache::new(Arc::new(MockTokenSource::new())));
        let client = GatewayClient::new(
            &GatewayConfig::default(),
            transport,
            cache,
            Arc::new(NoopMetricsSink),
        );

        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.url_for("api/v1/search"), "http://localhost:8000/api/v1/search");
    }

    #[test]
    fn test_error_message_precedence() {
        let message = TransportResponse::new(400, json!({ "message": "m", "detail": "d" }).to_string());
        let detail = TransportResponse::new(400, json!({ "detail": "d" }).to_string());
        let structured = TransportResponse::new(
            422,
            json!({ "detail": [{ "loc": ["q"], "msg": "required" }] }).to_string(),
        );

        assert_eq!(error_message(&message), "m");
        assert_eq!(error_message(&detail), "d");
        assert!(error_message(&structured).contains("required"));
    }
}
