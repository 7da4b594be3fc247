use std::fmt;
use std::sync::Arc;

use super::HttpMethod;

/// Shape check applied to a successful response body before decoding
pub type ShapeValidator = Arc<dyn Fn(&serde_json::Value) -> Result<(), String> + Send + Sync>;

/// Whether an endpoint can be called without a credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Credential attached when available, omitted otherwise
    #[default]
    Public,
    /// Fails with an auth error when no credential can be obtained
    Protected,
}

/// Per-call options for `GatewayClient::request`
#[derive(Clone, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub access: Access,
    pub validator: Option<ShapeValidator>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn protected(mut self) -> Self {
        self.access = Access::Protected;
        self
    }

    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("query", &self.query)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .field("access", &self.access)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}
