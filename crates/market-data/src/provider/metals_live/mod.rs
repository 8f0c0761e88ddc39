//! metals.live provider for silver spot prices.
//!
//! The spot endpoint answers with a list of observations, newest first:
//!
//! ```json
//! [{"price": 24.31, "timestamp": 1709765998000}]
//! ```
//!
//! Prices occasionally arrive as strings, so the field is coerced.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::fetch::Fetcher;
use crate::models::{Quote, QuoteKind};
use crate::normalize::{number_from_value, timestamp_from_value};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "METALS_LIVE";
const SPOT_URL: &str = "https://api.metals.live/v1/spot/silver";
const PRICE_FIELD: &str = "price";
const TIMESTAMP_FIELD: &str = "timestamp";

pub struct MetalsLiveProvider {
    fetcher: Arc<dyn Fetcher>,
}

impl MetalsLiveProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl QuoteProvider for MetalsLiveProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::SilverPrice
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let value = self.fetcher.fetch_json(SPOT_URL).await?;
        parse_metals_live(&value)
    }
}

/// Take the first element of a non-empty array and read its price.
pub fn parse_metals_live(value: &Value) -> Result<Quote, MarketDataError> {
    let first = value
        .as_array()
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "expected a JSON array"))?
        .first()
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "empty array"))?;

    let raw = first.get(PRICE_FIELD).ok_or_else(|| {
        MarketDataError::parse(PROVIDER_ID, format!("missing field '{}'", PRICE_FIELD))
    })?;

    let price = number_from_value(raw).ok_or_else(|| {
        MarketDataError::parse(PROVIDER_ID, format!("price {} is not a finite number", raw))
    })?;

    let observed_at = first
        .get(TIMESTAMP_FIELD)
        .and_then(timestamp_from_value)
        .unwrap_or_else(Utc::now);

    Ok(Quote::new(price, PROVIDER_ID, observed_at))
}
