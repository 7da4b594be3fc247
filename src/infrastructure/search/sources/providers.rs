use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::{id_from_value, join_parts};
use crate::domain::search::{Category, ProviderPayload, ResultItem, SearchSource};
use crate::domain::ApiError;
use crate::infrastructure::http::{GatewayClient, RequestOptions};

pub const PROVIDER_SEARCH_ENDPOINT: &str = "/api/v1/providers/search";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProviderResponse {
    Wrapped { providers: Vec<RawProvider> },
    Bare(Vec<RawProvider>),
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    provider_id: Option<serde_json::Value>,
    id: Option<serde_json::Value>,
    provider_name: Option<String>,
    name: Option<String>,
    specialty: Option<String>,
    city: Option<String>,
    state: Option<String>,
    rating: Option<f64>,
}

impl RawProvider {
    fn into_item(self) -> Option<ResultItem> {
        let id = self
            .provider_id
            .as_ref()
            .and_then(id_from_value)
            .or_else(|| self.id.as_ref().and_then(id_from_value))?;
        let name = self.provider_name.or(self.name)?;

        let location = match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{}, {}", city, state)),
            (Some(city), None) => Some(city.clone()),
            (None, Some(state)) => Some(state.clone()),
            (None, None) => None,
        };
        let summary = join_parts(&[self.specialty.clone(), location]);

        let item = ResultItem::provider(
            id,
            name,
            ProviderPayload {
                specialty: self.specialty,
                city: self.city,
                state: self.state,
                rating: self.rating,
            },
        );

        Some(match summary {
            Some(summary) => item.with_secondary(summary),
            None => item,
        })
    }
}

/// Doctors and facilities from the provider search endpoint
#[derive(Debug)]
pub struct ProviderSource {
    gateway: Arc<GatewayClient>,
}

impl ProviderSource {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl SearchSource for ProviderSource {
    fn category(&self) -> Category {
        Category::Provider
    }

    fn name(&self) -> &'static str {
        "providers"
    }

    async fn search(&self, text: &str) -> Result<Vec<ResultItem>, ApiError> {
        let response: ProviderResponse = self
            .gateway
            .request(PROVIDER_SEARCH_ENDPOINT, RequestOptions::get().query("q", text))
            .await?;

        let entries = match response {
            ProviderResponse::Wrapped { providers } => providers,
            ProviderResponse::Bare(providers) => providers,
        };

        Ok(entries.into_iter().filter_map(RawProvider::into_item).collect())
    }
}
