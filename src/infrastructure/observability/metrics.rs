//! API call metrics: bounded in-memory history plus the `metrics` facade

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::{ApiCallMetrics, MetricsSink};

pub const DEFAULT_HISTORY_LENGTH: usize = 50;
pub const SLOW_CALL_THRESHOLD_MS: u64 = 1000;

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("valid UUID regex")
});

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric segment regex"));

/// Aggregate view over the recorded history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiPerformanceStats {
    pub total_calls: usize,
    pub average_duration_ms: u64,
    pub slow_calls: Vec<ApiCallMetrics>,
    /// Percentage of calls that errored, rounded to two decimals
    pub error_rate: f64,
    /// Last ten calls, newest first
    pub recent_calls: Vec<ApiCallMetrics>,
}

/// Bounded call history; the oldest record is evicted when full
#[derive(Debug)]
pub struct ApiCallHistory {
    capacity: usize,
    entries: Mutex<VecDeque<ApiCallMetrics>>,
}

impl ApiCallHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LENGTH)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn history(&self) -> Vec<ApiCallMetrics> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> ApiPerformanceStats {
        let entries = self.history();

        if entries.is_empty() {
            return ApiPerformanceStats {
                total_calls: 0,
                average_duration_ms: 0,
                slow_calls: Vec::new(),
                error_rate: 0.0,
                recent_calls: Vec::new(),
            };
        }

        let total_calls = entries.len();
        let total_duration: u64 = entries.iter().map(|call| call.duration_ms).sum();
        let average_duration_ms =
            (total_duration as f64 / total_calls as f64).round() as u64;

        let errors = entries.iter().filter(|call| call.is_error()).count();
        let error_rate = ((errors as f64 / total_calls as f64) * 100.0 * 100.0).round() / 100.0;

        let slow_calls = entries
            .iter()
            .filter(|call| call.duration_ms > SLOW_CALL_THRESHOLD_MS)
            .cloned()
            .collect();

        let recent_calls = entries.iter().rev().take(10).cloned().collect();

        ApiPerformanceStats {
            total_calls,
            average_duration_ms,
            slow_calls,
            error_rate,
            recent_calls,
        }
    }
}

impl Default for ApiCallHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for ApiCallHistory {
    fn record(&self, metrics: ApiCallMetrics) {
        record_api_call(&metrics);

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_back(metrics);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }
}

/// Forward a call record to the `metrics` facade and the log
pub fn record_api_call(call: &ApiCallMetrics) {
    let endpoint = sanitize_endpoint(&call.endpoint);
    let labels = [
        ("endpoint", endpoint.clone()),
        ("status", call.status.to_string()),
    ];

    counter!("api_calls_total", &labels).increment(1);
    histogram!("api_call_duration_seconds", &labels)
        .record(Duration::from_millis(call.duration_ms).as_secs_f64());

    if call.is_error() {
        counter!("api_call_errors_total", &labels).increment(1);
    }

    tracing::debug!(
        endpoint = %endpoint,
        status = call.status,
        duration_ms = call.duration_ms,
        error = call.error.as_deref().unwrap_or(""),
        "API call"
    );

    if call.duration_ms > SLOW_CALL_THRESHOLD_MS {
        tracing::warn!(
            endpoint = %endpoint,
            duration_ms = call.duration_ms,
            "Slow API request"
        );
    }
}

/// Endpoint label with query string removed and IDs collapsed to `{id}`
fn sanitize_endpoint(endpoint: &str) -> String {
    let path = endpoint.split('?').next().unwrap_or(endpoint);
    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(64).collect()
}
