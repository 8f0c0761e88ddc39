use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderValue,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    auth::require_admin_token,
    config::Config,
    error::ApiResult,
    main_lib::AppState,
    models::{MarketDataSnapshot, SilverValueResponse, ValuationConstants, ValuationResult},
};
use argentum_core::valuation::ProviderDiagnostics;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(get, path = "/api/v1/readyz", responses((status = 200, description = "Ready")))]
pub async fn readyz() -> &'static str {
    "ok"
}

#[utoipa::path(
    get,
    path = "/api/v1/silver-value",
    responses(
        (status = 200, description = "Current value of the configured silver", body = SilverValueResponse),
        (status = 502, description = "A quote could not be resolved from any provider")
    )
)]
pub async fn get_silver_value(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SilverValueResponse>> {
    let valuation = state.valuation_service.compute_valuation().await?;
    Ok(Json(SilverValueResponse::from(valuation)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/providers",
    responses(
        (status = 200, description = "Outcome of every provider in both chains"),
        (status = 401, description = "Missing or wrong admin token"),
        (status = 404, description = "No admin token configured")
    )
)]
pub async fn get_provider_diagnostics(
    State(state): State<Arc<AppState>>,
) -> Json<ProviderDiagnostics> {
    let diagnostics = state.valuation_service.probe_providers().await;
    tracing::info!(
        silver = %diagnostics.silver.summary(),
        exchange_rate = %diagnostics.exchange_rate.summary(),
        "Provider probe finished"
    );
    Json(diagnostics)
}

#[derive(OpenApi)]
#[openapi(
    paths(healthz, readyz, get_silver_value, get_provider_diagnostics),
    components(schemas(
        SilverValueResponse,
        ValuationConstants,
        MarketDataSnapshot,
        ValuationResult
    ))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let admin = Router::new()
        .route("/providers", get(get_provider_diagnostics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_token,
        ));

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/silver-value", get(get_silver_value))
        .nest("/admin", admin);

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
