//! Per-call performance records emitted by the gateway

use chrono::{DateTime, Utc};
use serde::Serialize;

#[cfg(test)]
use mockall::automock;

/// Outcome of a single gateway call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiCallMetrics {
    pub endpoint: String,
    pub duration_ms: u64,
    /// HTTP status, or 0 when no response was received
    pub status: u16,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ApiCallMetrics {
    pub fn new(endpoint: impl Into<String>, duration_ms: u64, status: u16) -> Self {
        Self {
            endpoint: endpoint.into(),
            duration_ms,
            status,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some() || self.status >= 400
    }
}

/// Observability collaborator receiving one record per completed call
#[cfg_attr(test, automock)]
pub trait MetricsSink: Send + Sync {
    fn record(&self, metrics: ApiCallMetrics);
}

/// Sink that drops every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _metrics: ApiCallMetrics) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detection() {
        assert!(!ApiCallMetrics::new("/api/v1/search", 12, 200).is_error());
        assert!(ApiCallMetrics::new("/api/v1/search", 12, 404).is_error());
        assert!(ApiCallMetrics::new("/api/v1/search", 12, 0)
            .with_error("connection refused")
            .is_error());
    }
}
