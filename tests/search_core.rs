//! End-to-end search against a mocked backend

use serde_json::json;
use wiremock::matchers::{path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use care_price_core::domain::{Category, ResultOrigin, SearchPhase};
use care_price_core::{AppConfig, SearchCore, create_search_core};

fn core_for(server: &MockServer) -> SearchCore {
    let mut config = AppConfig::default();
    config.gateway = config.gateway.with_base_url(server.uri());
    create_search_core(&config)
}

async fn mount_token(server: &MockServer) {
    Mock::given(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "tok", "expiresIn": 3600 })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_live_results_merge_in_precedence_order() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(path("/api/v1/search"))
        .and(query_param("q", "cardio"))
        .and(query_param("radius", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "slug": "echocardiogram",
                    "display_name": "Echocardiogram",
                    "category_name": "Cardiology",
                    "provider_count": 6,
                    "best_price": 400
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(path("/api/v1/providers/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "providers": [
                { "provider_id": "1", "provider_name": "Dr. Sarah Johnson", "specialty": "Cardiology" },
                { "provider_id": "2", "provider_name": "Dr. Lee Chen", "specialty": "Cardiology" },
                { "provider_id": "3", "provider_name": "Dr. Emily Rivera", "specialty": "Cardiology" },
                { "provider_id": "4", "provider_name": "Dr. James Wilson", "specialty": "Cardiology" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(path("/api/v1/specialties"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Cardiology" },
            { "name": "Dermatology" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let core = core_for(&server);
    let set = core.aggregator.search_now("cardio").await.unwrap();

    assert_eq!(set.origin, ResultOrigin::Live);
    assert_eq!(
        set.categories(),
        vec![Category::Provider, Category::Specialty, Category::Procedure]
    );
    assert_eq!(set.in_category(Category::Provider).count(), 3);
    assert_eq!(set.len(), 5);
    assert_eq!(
        set.items[4].secondary_text.as_deref(),
        Some("Cardiology • 6 providers • $400")
    );

    let stats = core.history.stats();
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.error_rate, 0.0);

    // specialties listing is reused for the next query
    let set = core.aggregator.search_now("derm").await.unwrap();
    assert!(set.in_category(Category::Specialty).any(|i| i.primary_text == "Dermatology"));
}

#[tokio::test]
async fn test_backend_outage_degrades_to_fallback_catalog() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    for endpoint in ["/api/v1/search", "/api/v1/providers/search", "/api/v1/specialties"] {
        Mock::given(path(endpoint))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({ "detail": "maintenance" })))
            .mount(&server)
            .await;
    }

    let core = core_for(&server);
    let set = core.aggregator.search_now("brain mri").await.unwrap();

    assert!(set.is_degraded());
    assert_eq!(set.items[0].primary_text, "MRI - Brain");
    assert_eq!(core.aggregator.snapshot().phase, SearchPhase::Fallback);

    let stats = core.history.stats();
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.error_rate, 100.0);
}

#[tokio::test]
async fn test_local_medications_survive_backend_outage() {
    let server = MockServer::start().await;
    // No mocks mounted: every backend call answers 404

    let core = core_for(&server);
    let set = core.aggregator.search_now("lipitor").await.unwrap();

    assert_eq!(set.origin, ResultOrigin::Live);
    assert_eq!(set.items.len(), 1);
    assert_eq!(set.items[0].primary_text, "Lipitor - Atorvastatin");
}
