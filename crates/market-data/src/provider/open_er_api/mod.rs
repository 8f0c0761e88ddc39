//! open.er-api.com provider for exchange rates.
//!
//! Keyless daily rates keyed by ISO 4217 code:
//!
//! ```json
//! {"result": "success", "base_code": "USD", "time_last_update_unix": 1709683351,
//!  "rates": {"USD": 1, "PEN": 3.712, "EUR": 0.921}}
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::fetch::Fetcher;
use crate::models::{Quote, QuoteKind};
use crate::normalize::{number_from_value, timestamp_from_value};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "OPEN_ER_API";
const BASE_URL: &str = "https://open.er-api.com/v6/latest";

pub struct OpenErApiProvider {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    currency: String,
}

impl OpenErApiProvider {
    /// Rates for `currency` units per one `base`.
    pub fn new(fetcher: Arc<dyn Fetcher>, base: &str, currency: &str) -> Self {
        Self {
            fetcher,
            url: format!("{}/{}", BASE_URL, urlencoding::encode(&base.to_uppercase())),
            currency: currency.to_uppercase(),
        }
    }
}

#[async_trait]
impl QuoteProvider for OpenErApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::ExchangeRate
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let value = self.fetcher.fetch_json(&self.url).await?;
        parse_open_er_api(&value, &self.currency)
    }
}

/// Look up `currency` in the `rates` map.
pub fn parse_open_er_api(value: &Value, currency: &str) -> Result<Quote, MarketDataError> {
    let result = value.get("result").and_then(Value::as_str);
    if result != Some("success") {
        let reason = value
            .get("error-type")
            .and_then(Value::as_str)
            .unwrap_or("result is not 'success'");
        return Err(MarketDataError::parse(PROVIDER_ID, reason));
    }

    let rates = value
        .get("rates")
        .and_then(Value::as_object)
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "missing 'rates' object"))?;

    let raw = rates
        .get(currency)
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, format!("no rate for {}", currency)))?;

    let rate = number_from_value(raw).ok_or_else(|| {
        MarketDataError::parse(
            PROVIDER_ID,
            format!("{} rate {} is not a finite number", currency, raw),
        )
    })?;

    let observed_at = value
        .get("time_last_update_unix")
        .and_then(timestamp_from_value)
        .unwrap_or_else(Utc::now);

    Ok(Quote::new(rate, PROVIDER_ID, observed_at))
}
