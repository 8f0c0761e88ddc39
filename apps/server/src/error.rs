use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use argentum_core::errors::Error as CoreError;
use argentum_market_data::{errors::render_failures, MarketDataError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

/// Body of a failed valuation.
#[derive(Serialize)]
struct ValuationErrorBody {
    success: bool,
    error: String,
    detail: String,
}

impl ApiError {
    fn valuation_failure(error: String, detail: String) -> Response {
        let body = Json(ValuationErrorBody {
            success: false,
            error,
            detail,
        });
        (StatusCode::BAD_GATEWAY, body).into_response()
    }
}

/// Short summary plus the per-provider reasons behind a market data failure.
fn describe_market_error(err: &MarketDataError) -> (String, String) {
    match err {
        MarketDataError::AllProvidersFailed { kind, failures } => (
            format!("Unable to fetch {}", kind),
            render_failures(failures),
        ),
        other => ("Unable to fetch market data".to_string(), other.to_string()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => match e {
                CoreError::MarketData(market) => {
                    tracing::warn!("Valuation failed: {}", market);
                    let (error, detail) = describe_market_error(market);
                    return Self::valuation_failure(error, detail);
                }
                CoreError::Calculation(reason) => {
                    tracing::warn!("Valuation failed: {}", reason);
                    return Self::valuation_failure(
                        "Unable to compute valuation".to_string(),
                        reason.clone(),
                    );
                }
                CoreError::InvalidConfigValue(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
