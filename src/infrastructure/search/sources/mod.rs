//! Search source adapters
//!
//! Each adapter owns one backend shape and maps it into `ResultItem`s of a
//! single category, keeping the backend's relevance order.

mod medications;
mod procedures;
mod providers;
mod specialties;

pub use medications::{Medication, MedicationSource};
pub use procedures::{PROCEDURE_SEARCH_ENDPOINT, ProcedureSource};
pub use providers::{PROVIDER_SEARCH_ENDPOINT, ProviderSource};
pub use specialties::{SPECIALTIES_ENDPOINT, SpecialtySource};

pub(crate) use procedures::procedure_summary;

/// String or numeric identifier as a string
fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Present parts joined with `" • "`, or `None` when nothing is present
fn join_parts(parts: &[Option<String>]) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .flatten()
        .map(String::as_str)
        .filter(|part| !part.is_empty())
        .collect();

    if present.is_empty() {
        None
    } else {
        Some(present.join(" • "))
    }
}

#[cfg(test)]
pub(crate) fn test_gateway(
    transport: crate::infrastructure::http::mock::MockTransport,
) -> (
    std::sync::Arc<crate::infrastructure::http::GatewayClient>,
    std::sync::Arc<crate::infrastructure::http::mock::MockTransport>,
) {
    use crate::config::GatewayConfig;
    use crate::domain::NoopMetricsSink;
    use crate::domain::credentials::mock::MockTokenSource;
    use crate::infrastructure::auth::TokenCache;
    use crate::infrastructure::http::GatewayClient;
    use std::sync::Arc;

    let transport = Arc::new(transport);
    let tokens = Arc::new(TokenCache::new(Arc::new(MockTokenSource::new())));
    let gateway = GatewayClient::new(
        &GatewayConfig::default().with_base_url("https://api.example.com"),
        transport.clone(),
        tokens,
        Arc::new(NoopMetricsSink),
    );

    (Arc::new(gateway), transport)
}
