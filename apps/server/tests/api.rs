use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use tempfile::tempdir;
use tower::ServiceExt;

use argentum_core::valuation::{
    calculate_derived_value, MarketData, ProviderDiagnostics, SilverValuation, ValuationServiceTrait,
    ValuationSettings,
};
use argentum_core::{Error as CoreError, Result as CoreResult};
use argentum_market_data::{
    FetchDiagnostics, MarketDataError, ProviderFailure, Quote, QuoteKind,
};
use argentum_server::{api::app_router, config::Config, static_service, AppState};

struct FixedValuationService {
    settings: ValuationSettings,
    fail: bool,
}

#[async_trait]
impl ValuationServiceTrait for FixedValuationService {
    async fn compute_valuation(&self) -> CoreResult<SilverValuation> {
        if self.fail {
            return Err(CoreError::MarketData(MarketDataError::AllProvidersFailed {
                kind: QuoteKind::SilverPrice,
                failures: vec![
                    ProviderFailure::new("STOOQ", "HTTP 503"),
                    ProviderFailure::new("GOLD_API", "timed out after 5s"),
                ],
            }));
        }
        let now = Utc::now();
        Ok(SilverValuation {
            computed_at: now,
            settings: self.settings.clone(),
            troy_ounces: self.settings.troy_ounces(),
            market_data: MarketData {
                silver: Quote::new(31.1034768, "STOOQ", now),
                exchange_rate: Quote::new(3.7, "OPEN_ER_API", now),
            },
            value: calculate_derived_value(31.1034768, 3.7, &self.settings),
        })
    }

    async fn probe_providers(&self) -> ProviderDiagnostics {
        let mut silver = FetchDiagnostics::new(QuoteKind::SilverPrice);
        silver.record_success("STOOQ", 31.1034768, Utc::now(), 12);
        let mut exchange_rate = FetchDiagnostics::new(QuoteKind::ExchangeRate);
        exchange_rate.record_error("OPEN_ER_API", "HTTP 500".to_string(), 8);
        ProviderDiagnostics {
            silver,
            exchange_rate,
        }
    }
}

fn build_test_router(fail: bool, admin_token: Option<&str>) -> Router {
    let config = Config {
        admin_token: admin_token.map(str::to_string),
        ..Config::default()
    };
    let state = Arc::new(AppState {
        valuation_service: Arc::new(FixedValuationService {
            settings: config.valuation_settings(),
            fail,
        }),
        admin_token: config.admin_token.clone(),
    });
    app_router(state, &config)
}

async fn get(app: Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn health_endpoints_respond_ok() {
    for uri in ["/api/v1/healthz", "/api/v1/readyz"] {
        let (status, body) = get(build_test_router(false, None), uri, &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }
}

#[tokio::test]
async fn silver_value_returns_valuation() {
    let (status, body) = get(build_test_router(false, None), "/api/v1/silver-value", &[]).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["constants"]["grams"], 9.6);
    assert_eq!(json["constants"]["surchargeRate"], 0.18);
    assert_eq!(json["marketData"]["silverSource"], "STOOQ");
    assert_eq!(json["marketData"]["exchangeRate"], 3.7);

    let value_local = json["result"]["valueLocal"].as_f64().unwrap();
    let with_surcharge = json["result"]["valueLocalWithSurcharge"].as_f64().unwrap();
    assert!((value_local - 35.52).abs() < 1e-9);
    assert!((with_surcharge - 41.9136).abs() < 1e-9);
}

#[tokio::test]
async fn silver_value_failure_is_bad_gateway() {
    let (status, body) = get(build_test_router(true, None), "/api/v1/silver-value", &[]).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Unable to fetch silver price");
    assert_eq!(json["detail"], "STOOQ: HTTP 503; GOLD_API: timed out after 5s");
}

#[tokio::test]
async fn admin_providers_hidden_without_token() {
    let (status, _) = get(
        build_test_router(false, None),
        "/api/v1/admin/providers",
        &[("x-admin-token", "anything")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_providers_rejects_missing_or_wrong_token() {
    let (status, _) = get(build_test_router(false, Some("s3cret")), "/api/v1/admin/providers", &[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(
        build_test_router(false, Some("s3cret")),
        "/api/v1/admin/providers",
        &[("authorization", "Bearer wrong")],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_providers_reports_diagnostics() {
    for headers in [
        [("authorization", "Bearer s3cret")],
        [("x-admin-token", "s3cret")],
    ] {
        let (status, body) = get(
            build_test_router(false, Some("s3cret")),
            "/api/v1/admin/providers",
            &headers,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["silver"]["kind"], "silverPrice");
        assert_eq!(json["silver"]["attempts"][0]["providerId"], "STOOQ");
        assert_eq!(json["silver"]["attempts"][0]["success"], true);
        assert_eq!(json["exchangeRate"]["attempts"][0]["error"], "HTTP 500");
    }
}

#[tokio::test]
async fn openapi_document_lists_silver_value() {
    let (status, body) = get(build_test_router(false, None), "/openapi.json", &[]).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/api/v1/silver-value"].is_object());
}

#[tokio::test]
async fn serves_index_html_for_unknown_route() {
    let static_dir = tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<html>Argentum</html>").unwrap();

    let app = build_test_router(false, None).fallback_service(static_service(static_dir.path()));
    let (status, body) = get(app, "/calculator", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<html>Argentum</html>");
}
