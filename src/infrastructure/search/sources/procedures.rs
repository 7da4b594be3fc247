use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::{id_from_value, join_parts};
use crate::domain::search::{Category, ProcedurePayload, ResultItem, SearchSource};
use crate::domain::ApiError;
use crate::infrastructure::http::{GatewayClient, RequestOptions};

pub const PROCEDURE_SEARCH_ENDPOINT: &str = "/api/v1/search";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProcedureResponse {
    Wrapped { results: Vec<RawProcedure> },
    Bare(Vec<RawProcedure>),
}

impl ProcedureResponse {
    fn into_entries(self) -> Vec<RawProcedure> {
        match self {
            ProcedureResponse::Wrapped { results } => results,
            ProcedureResponse::Bare(results) => results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawProcedure {
    slug: Option<String>,
    id: Option<serde_json::Value>,
    display_name: Option<String>,
    name: Option<String>,
    category_name: Option<String>,
    category: Option<String>,
    provider_count: Option<u32>,
    best_price: Option<f64>,
}

impl RawProcedure {
    fn into_item(self) -> Option<ResultItem> {
        let key = self
            .slug
            .filter(|slug| !slug.is_empty())
            .or_else(|| self.id.as_ref().and_then(id_from_value))?;

        let name = self
            .display_name
            .or(self.name)
            .unwrap_or_else(|| key.clone());
        let category_name = self.category_name.or(self.category);
        let summary = procedure_summary(
            category_name.as_deref(),
            self.provider_count,
            self.best_price,
        );

        let item = ResultItem::procedure(
            key.clone(),
            name,
            ProcedurePayload {
                slug: key,
                category_name,
                provider_count: self.provider_count,
                best_price: self.best_price,
            },
        );

        Some(match summary {
            Some(summary) => item.with_secondary(summary),
            None => item,
        })
    }
}

/// `"{category} • {n} providers • ${price}"`, skipping absent parts
pub(crate) fn procedure_summary(
    category: Option<&str>,
    provider_count: Option<u32>,
    best_price: Option<f64>,
) -> Option<String> {
    join_parts(&[
        category.map(str::to_string),
        provider_count.map(|n| format!("{} providers", n)),
        best_price.map(|price| format!("${}", format_price(price))),
    ])
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// Priced procedures from the backend search endpoint
#[derive(Debug)]
pub struct ProcedureSource {
    gateway: Arc<GatewayClient>,
    radius_miles: u32,
    zip_code: Option<String>,
}

impl ProcedureSource {
    pub fn new(gateway: Arc<GatewayClient>, radius_miles: u32) -> Self {
        Self {
            gateway,
            radius_miles,
            zip_code: None,
        }
    }

    pub fn with_zip_code(mut self, zip_code: Option<String>) -> Self {
        self.zip_code = zip_code.filter(|zip| !zip.trim().is_empty());
        self
    }
}

#[async_trait]
impl SearchSource for ProcedureSource {
    fn category(&self) -> Category {
        Category::Procedure
    }

    fn name(&self) -> &'static str {
        "procedures"
    }

    async fn search(&self, text: &str) -> Result<Vec<ResultItem>, ApiError> {
        let mut options = RequestOptions::get()
            .query("q", text)
            .query("radius", self.radius_miles.to_string());

        if let Some(zip) = &self.zip_code {
            options = options.query("zip_code", zip.clone());
        }

        let response: ProcedureResponse = self
            .gateway
            .request(PROCEDURE_SEARCH_ENDPOINT, options)
            .await?;

        let entries = response.into_entries();
        let total = entries.len();
        let items: Vec<ResultItem> = entries
            .into_iter()
            .filter_map(RawProcedure::into_item)
            .collect();

        if items.len() < total {
            tracing::debug!(
                skipped = total - items.len(),
                "Skipped procedures without slug or id"
            );
        }

        Ok(items)
    }
}
