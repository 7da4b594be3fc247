use std::fmt;

use thiserror::Error;

/// Failure classes produced by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    Network,
    Timeout,
    Auth,
    Server,
    Client,
    Cors,
    Validation,
    EmptyResults,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiErrorKind::Network => "network",
            ApiErrorKind::Timeout => "timeout",
            ApiErrorKind::Auth => "auth",
            ApiErrorKind::Server => "server",
            ApiErrorKind::Client => "client",
            ApiErrorKind::Cors => "cors",
            ApiErrorKind::Validation => "validation",
            ApiErrorKind::EmptyResults => "empty_results",
        };
        write!(f, "{}", name)
    }
}

/// Errors surfaced by the gateway and the search sources
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Request timed out: {message}")]
    Timeout { message: String },

    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request rejected ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Cross-origin request blocked: {message}")]
    Cors { message: String },

    #[error("Invalid response: {message}")]
    Validation { message: String },

    /// Reserved for callers that want to surface "nothing found" as an error.
    /// The gateway never returns it; an empty body is a resolved, empty result.
    #[error("No results: {message}")]
    EmptyResults { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    pub fn client(status: u16, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    pub fn cors(message: impl Into<String>) -> Self {
        Self::Cors {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Not produced by the gateway or the aggregator
    pub fn empty_results(message: impl Into<String>) -> Self {
        Self::EmptyResults {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network { .. } => ApiErrorKind::Network,
            ApiError::Timeout { .. } => ApiErrorKind::Timeout,
            ApiError::Auth { .. } => ApiErrorKind::Auth,
            ApiError::Server { .. } => ApiErrorKind::Server,
            ApiError::Client { .. } => ApiErrorKind::Client,
            ApiError::Cors { .. } => ApiErrorKind::Cors,
            ApiError::Validation { .. } => ApiErrorKind::Validation,
            ApiError::EmptyResults { .. } => ApiErrorKind::EmptyResults,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Network { message }
            | ApiError::Timeout { message }
            | ApiError::Auth { message }
            | ApiError::Server { message, .. }
            | ApiError::Client { message, .. }
            | ApiError::Cors { message }
            | ApiError::Validation { message }
            | ApiError::EmptyResults { message } => message,
        }
    }

    /// HTTP status that produced the error, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } | ApiError::Client { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether re-issuing the same request may succeed
    pub fn retryable(&self) -> bool {
        match self {
            ApiError::Network { .. }
            | ApiError::Timeout { .. }
            | ApiError::Server { .. }
            | ApiError::Cors { .. } => true,
            ApiError::Client { status, .. } => matches!(status, 408 | 429),
            ApiError::Auth { .. } | ApiError::Validation { .. } | ApiError::EmptyResults { .. } => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_flags() {
        assert!(ApiError::network("offline").retryable());
        assert!(ApiError::timeout("30s").retryable());
        assert!(ApiError::server(503, "unavailable").retryable());
        assert!(ApiError::cors("preflight").retryable());
        assert!(!ApiError::auth("expired").retryable());
        assert!(!ApiError::validation("bad shape").retryable());
        assert!(!ApiError::empty_results("nothing").retryable());
    }

    #[test]
    fn test_client_error_retryable_only_for_throttling() {
        assert!(ApiError::client(429, "slow down").retryable());
        assert!(ApiError::client(408, "request timeout").retryable());
        assert!(!ApiError::client(404, "missing").retryable());
        assert!(!ApiError::client(422, "bad input").retryable());
    }

    #[test]
    fn test_kind_and_status() {
        let error = ApiError::server(502, "bad gateway");
        assert_eq!(error.kind(), ApiErrorKind::Server);
        assert_eq!(error.status(), Some(502));
        assert_eq!(error.message(), "bad gateway");
        assert_eq!(ApiError::network("x").status(), None);
    }

    #[test]
    fn test_display() {
        let error = ApiError::server(500, "boom");
        assert_eq!(error.to_string(), "Server error (500): boom");
        assert_eq!(ApiErrorKind::EmptyResults.to_string(), "empty_results");
    }
}
