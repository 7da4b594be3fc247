//! Domain layer - types and seams shared by the gateway and the search core

pub mod credentials;
pub mod error;
pub mod metrics;
pub mod search;

pub use credentials::{Clock, Credential, ManualClock, SystemClock, TokenGrant, TokenSource};
pub use error::{ApiError, ApiErrorKind};
pub use metrics::{ApiCallMetrics, MetricsSink, NoopMetricsSink};
pub use search::{
    AggregatedResultSet, Category, ResultItem, ResultOrigin, ResultPayload, SearchPhase,
    SearchQuery, SearchSnapshot, SearchSource,
};
