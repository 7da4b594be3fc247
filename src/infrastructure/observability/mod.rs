//! Observability infrastructure - API call metrics

mod metrics;

pub use metrics::{
    ApiCallHistory, ApiPerformanceStats, DEFAULT_HISTORY_LENGTH, SLOW_CALL_THRESHOLD_MS,
    record_api_call,
};
