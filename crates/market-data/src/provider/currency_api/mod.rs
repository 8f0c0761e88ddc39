//! currency-api provider for exchange rates, served from several mirrors.
//!
//! The same static JSON file is published on more than one CDN. Mirrors are
//! tried in order with the same fallback primitive the provider chain uses;
//! each failure is recorded against the mirror URL.
//!
//! ```json
//! {"date": "2024-03-06", "usd": {"pen": 3.7121, "eur": 0.9213}}
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
use crate::registry::first_success;

const PROVIDER_ID: &str = "CURRENCY_API";

/// Mirror URL templates, `{base}` is the lower-case base currency.
const MIRRORS: &[&str] = &[
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/{base}.json",
    "https://latest.currency-api.pages.dev/v1/currencies/{base}.json",
];

pub struct CurrencyApiProvider {
    fetcher: Arc<dyn Fetcher>,
    mirrors: Vec<String>,
    base: String,
    currency: String,
}

impl CurrencyApiProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>, base: &str, currency: &str) -> Self {
        let base = base.to_lowercase();
        let mirrors = MIRRORS
            .iter()
            .map(|template| template.replace("{base}", &urlencoding::encode(&base)))
            .collect();
        Self::with_mirrors(fetcher, mirrors, &base, currency)
    }

    /// Use explicit mirror URLs, tried in the given order.
    pub fn with_mirrors(
        fetcher: Arc<dyn Fetcher>,
        mirrors: Vec<String>,
        base: &str,
        currency: &str,
    ) -> Self {
        Self {
            fetcher,
            mirrors,
            base: base.to_lowercase(),
            currency: currency.to_lowercase(),
        }
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }
}

#[async_trait]
impl QuoteProvider for CurrencyApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::ExchangeRate
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        first_success(
            self.mirrors.iter(),
            |url: &&String| url.to_string(),
            |url| async move {
                let value = self.fetcher.fetch_json(url).await?;
                parse_currency_api(&value, &self.base, &self.currency)
            },
        )
        .await
        .map_err(|failures| MarketDataError::MirrorsExhausted {
            provider: PROVIDER_ID.to_string(),
            failures,
        })
    }
}

/// Read `<base>.<currency>` from the document (codes are lower-case).
pub fn parse_currency_api(value: &Value, base: &str, currency: &str) -> Result<Quote, MarketDataError> {
    let base = base.to_lowercase();
    let currency = currency.to_lowercase();

    let rates = value
        .get(&base)
        .and_then(Value::as_object)
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, format!("missing '{}' object", base)))?;

    let raw = rates.get(&currency).ok_or_else(|| {
        MarketDataError::parse(PROVIDER_ID, format!("no rate for {}", currency.to_uppercase()))
    })?;

    let rate = number_from_value(raw).ok_or_else(|| {
        MarketDataError::parse(
            PROVIDER_ID,
            format!("{} rate {} is not a finite number", currency.to_uppercase(), raw),
        )
    })?;

    let observed_at = value
        .get("date")
        .and_then(timestamp_from_value)
        .unwrap_or_else(Utc::now);

    Ok(Quote::new(rate, PROVIDER_ID, observed_at))
}
