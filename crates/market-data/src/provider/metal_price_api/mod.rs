//! Metal Price API provider for silver spot prices.
//!
//! Requires an API key, so it is only registered when one is configured.
//! The `latest` endpoint reports metals as a rates map relative to the base
//! currency:
//!
//! ```json
//! {"success": true, "base": "USD", "timestamp": 1709765998,
//!  "rates": {"XAG": 0.041135, "USDXAG": 24.31}}
//! ```
//!
//! `XAG` is troy ounces per one USD; `USDXAG` (when present) is already the
//! price per ounce.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::fetch::Fetcher;
use crate::models::{Quote, QuoteKind};
use crate::normalize::{number_from_value, timestamp_from_unix};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "METAL_PRICE_API";
const BASE_URL: &str = "https://api.metalpriceapi.com/v1/latest";
const BASE_CURRENCY: &str = "USD";
const SILVER_SYMBOL: &str = "XAG";

/// API response from Metal Price API
#[derive(Debug, Deserialize)]
struct MetalPriceResponse {
    /// Whether the request was successful
    success: bool,
    /// Unix timestamp of the quote
    #[serde(default)]
    timestamp: Option<i64>,
    /// Rates for requested metals (1 base_currency = rate troy ounces)
    #[serde(default)]
    rates: HashMap<String, Value>,
    /// Error details when `success` is false
    #[serde(default)]
    error: Option<MetalPriceErrorBody>,
}

#[derive(Debug, Deserialize)]
struct MetalPriceErrorBody {
    #[serde(default)]
    info: Option<String>,
}

/// Metal Price API provider for silver spot prices.
///
/// # Example
///
/// ```ignore
/// use argentum_market_data::provider::metal_price_api::MetalPriceApiProvider;
///
/// let provider = MetalPriceApiProvider::new(fetcher, "your_api_key".to_string());
/// ```
pub struct MetalPriceApiProvider {
    fetcher: Arc<dyn Fetcher>,
    api_key: String,
}

impl MetalPriceApiProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>, api_key: String) -> Self {
        Self { fetcher, api_key }
    }

    fn latest_url(&self) -> String {
        format!(
            "{}?api_key={}&base={}&currencies={}",
            BASE_URL,
            urlencoding::encode(&self.api_key),
            BASE_CURRENCY,
            SILVER_SYMBOL
        )
    }
}

#[async_trait]
impl QuoteProvider for MetalPriceApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::SilverPrice
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let value = self
            .fetcher
            .fetch_json(&self.latest_url())
            .await
            .map_err(|e| e.redact(&urlencoding::encode(&self.api_key)))?;

        parse_metal_price_api(value)
    }
}

/// Extract the USD price per troy ounce of silver.
pub fn parse_metal_price_api(value: Value) -> Result<Quote, MarketDataError> {
    let response: MetalPriceResponse = serde_json::from_value(value).map_err(|e| {
        MarketDataError::parse(PROVIDER_ID, format!("unexpected response shape: {}", e))
    })?;

    // Check if the API request was successful
    if !response.success {
        let info = response
            .error
            .and_then(|e| e.info)
            .unwrap_or_else(|| "API request failed".to_string());
        return Err(MarketDataError::parse(PROVIDER_ID, info));
    }

    let direct_key = format!("{}{}", BASE_CURRENCY, SILVER_SYMBOL);
    let price = if let Some(direct) = response.rates.get(&direct_key) {
        number_from_value(direct).ok_or_else(|| {
            MarketDataError::parse(
                PROVIDER_ID,
                format!("{} rate {} is not a finite number", direct_key, direct),
            )
        })?
    } else {
        let rate = response
            .rates
            .get(SILVER_SYMBOL)
            .ok_or_else(|| {
                MarketDataError::parse(PROVIDER_ID, format!("no rate for {}", SILVER_SYMBOL))
            })
            .and_then(|raw| {
                number_from_value(raw).ok_or_else(|| {
                    MarketDataError::parse(
                        PROVIDER_ID,
                        format!("{} rate {} is not a finite number", SILVER_SYMBOL, raw),
                    )
                })
            })?;

        // API returns: 1 base_currency = rate troy ounces of metal
        // Price per troy ounce = 1 / rate
        if rate == 0.0 {
            return Err(MarketDataError::parse(PROVIDER_ID, "Invalid rate (zero)"));
        }
        1.0 / rate
    };

    let observed_at = response
        .timestamp
        .and_then(|t| timestamp_from_unix(t as f64))
        .unwrap_or_else(Utc::now);

    Ok(Quote::new(price, PROVIDER_ID, observed_at))
}
