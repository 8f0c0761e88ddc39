//! Gold API provider for silver spot prices.
//!
//! Free, keyless endpoint returning a flat JSON object:
//!
//! ```json
//! {"name": "Silver", "price": 24.31, "symbol": "XAG", "updatedAt": "2024-03-06T22:59:58Z"}
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

const PROVIDER_ID: &str = "GOLD_API";
const BASE_URL: &str = "https://api.gold-api.com/price";
const SILVER_SYMBOL: &str = "XAG";

pub struct GoldApiProvider {
    fetcher: Arc<dyn Fetcher>,
    url: String,
}

impl GoldApiProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            url: format!("{}/{}", BASE_URL, SILVER_SYMBOL),
        }
    }
}

#[async_trait]
impl QuoteProvider for GoldApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::SilverPrice
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let value = self.fetcher.fetch_json(&self.url).await?;
        parse_gold_api(&value)
    }
}

/// Read the top-level `price` field.
pub fn parse_gold_api(value: &Value) -> Result<Quote, MarketDataError> {
    let raw = value
        .get("price")
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "missing field 'price'"))?;

    let price = number_from_value(raw).ok_or_else(|| {
        MarketDataError::parse(PROVIDER_ID, format!("price {} is not a finite number", raw))
    })?;

    let observed_at = value
        .get("updatedAt")
        .and_then(timestamp_from_value)
        .unwrap_or_else(Utc::now);

    Ok(Quote::new(price, PROVIDER_ID, observed_at))
}
