use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::id_from_value;
use crate::domain::search::{Category, ResultItem, SearchSource, SpecialtyPayload, matcher};
use crate::domain::ApiError;
use crate::infrastructure::http::GatewayClient;

pub const SPECIALTIES_ENDPOINT: &str = "/api/v1/specialties";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpecialtyResponse {
    Wrapped { specialties: Vec<RawSpecialty> },
    Bare(Vec<RawSpecialty>),
}

#[derive(Debug, Deserialize)]
struct RawSpecialty {
    id: Option<serde_json::Value>,
    name: String,
    description: Option<String>,
}

#[derive(Debug, Clone)]
struct Specialty {
    id: String,
    name: String,
    description: Option<String>,
}

impl From<RawSpecialty> for Specialty {
    fn from(raw: RawSpecialty) -> Self {
        let id = raw
            .id
            .as_ref()
            .and_then(id_from_value)
            .unwrap_or_else(|| slugify(&raw.name));

        Self {
            id,
            name: raw.name,
            description: raw.description,
        }
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Medical specialties, listed once per process and filtered locally
#[derive(Debug)]
pub struct SpecialtySource {
    gateway: Arc<GatewayClient>,
    listing: OnceCell<Vec<Specialty>>,
}

impl SpecialtySource {
    pub fn new(gateway: Arc<GatewayClient>) -> Self {
        Self {
            gateway,
            listing: OnceCell::new(),
        }
    }

    async fn listing(&self) -> Result<&[Specialty], ApiError> {
        let listing = self
            .listing
            .get_or_try_init(|| async {
                let response: SpecialtyResponse = self.gateway.get(SPECIALTIES_ENDPOINT).await?;
                let raw = match response {
                    SpecialtyResponse::Wrapped { specialties } => specialties,
                    SpecialtyResponse::Bare(specialties) => specialties,
                };

                tracing::info!(count = raw.len(), "Loaded specialty listing");
                Ok::<_, ApiError>(raw.into_iter().map(Specialty::from).collect())
            })
            .await?;

        Ok(listing.as_slice())
    }
}

#[async_trait]
impl SearchSource for SpecialtySource {
    fn category(&self) -> Category {
        Category::Specialty
    }

    fn name(&self) -> &'static str {
        "specialties"
    }

    async fn search(&self, text: &str) -> Result<Vec<ResultItem>, ApiError> {
        let listing = self.listing().await?;

        Ok(listing
            .iter()
            .filter(|specialty| {
                let mut fields = vec![specialty.name.as_str()];
                if let Some(description) = &specialty.description {
                    fields.push(description.as_str());
                }
                matcher::candidate_matches(&fields, text)
            })
            .map(|specialty| {
                ResultItem::specialty(
                    specialty.id.clone(),
                    SpecialtyPayload {
                        name: specialty.name.clone(),
                        description: specialty.description.clone(),
                    },
                )
                .with_secondary(format!("Find {} specialists", specialty.name))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ApiErrorKind;
    use crate::infrastructure::http::mock::MockTransport;
    use crate::infrastructure::search::sources::test_gateway;
    use serde_json::json;

    fn listing() -> serde_json::Value {
        json!([
            { "id": 1, "name": "Cardiology", "description": "Heart and blood vessels" },
            { "name": "Dermatology" },
            { "name": "Orthopedic Surgery", "description": "Bones and joints" }
        ])
    }

    #[tokio::test]
    async fn test_listing_is_fetched_once() {
        let (gateway, transport) = test_gateway(MockTransport::new().respond(200, listing()));
        let source = SpecialtySource::new(gateway);

        let cardio = source.search("cardio").await.unwrap();
        let derm = source.search("drmtlgy").await.unwrap();

        assert_eq!(transport.request_count(), 1);
        assert!(transport.requests()[0].url.ends_with(SPECIALTIES_ENDPOINT));

        assert_eq!(cardio.len(), 1);
        assert_eq!(cardio[0].id, "1");
        assert_eq!(cardio[0].secondary_text.as_deref(), Some("Find Cardiology specialists"));

        assert_eq!(derm.len(), 1);
        assert_eq!(derm[0].id, "dermatology");
    }

    #[tokio::test]
    async fn test_multi_word_query_uses_description() {
        let (gateway, _) = test_gateway(MockTransport::new().respond(200, listing()));
        let source = SpecialtySource::new(gateway);

        let items = source.search("joints orthopedic").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "orthopedic-surgery");
    }

    #[tokio::test]
    async fn test_failed_listing_is_not_cached() {
        let (gateway, transport) = test_gateway(
            MockTransport::new()
                .respond(503, json!({ "detail": "unavailable" }))
                .respond(200, listing()),
        );
        let source = SpecialtySource::new(gateway);

        let err = source.search("cardio").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Server);

        let items = source.search("cardio").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(transport.request_count(), 2);
    }
}
