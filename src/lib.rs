//! Care Price Core
//!
//! Resilient data-access core for a healthcare price-comparison client:
//! - Credential caching with single-flight refresh
//! - An authenticated gateway with typed failures and bounded retries
//! - Debounced multi-source search with last-query-wins ordering
//! - A static fallback catalog for degraded operation

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::SearchSource;
use infrastructure::{
    auth::{HttpTokenSource, TokenCache},
    http::{GatewayClient, HttpTransport, ReqwestTransport},
    observability::ApiCallHistory,
    search::{
        FallbackDataset, MedicationSource, ProcedureSource, ProviderSource, SearchAggregator,
        SpecialtySource,
    },
};

/// Fully wired data-access core
#[derive(Debug, Clone)]
pub struct SearchCore {
    pub tokens: Arc<TokenCache>,
    pub gateway: Arc<GatewayClient>,
    pub history: Arc<ApiCallHistory>,
    pub aggregator: Arc<SearchAggregator>,
}

/// Wire the core against the configured backend using reqwest
pub fn create_search_core(config: &AppConfig) -> SearchCore {
    let transport = Arc::new(ReqwestTransport::with_timeout(config.gateway.timeout()));
    create_search_core_with_transport(config, transport)
}

pub fn create_search_core_with_transport(
    config: &AppConfig,
    transport: Arc<dyn HttpTransport>,
) -> SearchCore {
    let gateway_config = &config.gateway;

    let token_source = HttpTokenSource::new(
        transport.clone(),
        &gateway_config.resolved_base_url(),
        &gateway_config.token_endpoint,
        gateway_config.default_token_ttl(),
    )
    .with_timeout(gateway_config.timeout());

    let tokens = Arc::new(TokenCache::with_clock(
        Arc::new(token_source),
        Arc::new(domain::SystemClock),
        gateway_config.refresh_buffer(),
    ));

    let history = Arc::new(ApiCallHistory::new());
    let gateway = Arc::new(GatewayClient::new(
        gateway_config,
        transport,
        tokens.clone(),
        history.clone(),
    ));

    let search_config = &config.search;
    let sources: Vec<Arc<dyn SearchSource>> = vec![
        Arc::new(
            ProcedureSource::new(gateway.clone(), search_config.radius_miles)
                .with_zip_code(search_config.zip_code.clone()),
        ),
        Arc::new(ProviderSource::new(gateway.clone())),
        Arc::new(SpecialtySource::new(gateway.clone())),
        Arc::new(MedicationSource::builtin()),
    ];

    let aggregator = Arc::new(SearchAggregator::new(
        sources,
        FallbackDataset::builtin(),
        search_config,
    ));

    tracing::debug!(
        base_url = gateway.base_url(),
        precedence = ?search_config.precedence,
        "Search core wired"
    );

    SearchCore {
        tokens,
        gateway,
        history,
        aggregator,
    }
}
