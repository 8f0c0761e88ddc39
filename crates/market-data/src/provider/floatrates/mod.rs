//! FloatRates provider for exchange rates.
//!
//! The daily XML feed carries one `<item>` per target currency:
//!
//! ```xml
//! <item>
//!   <baseCurrency>USD</baseCurrency>
//!   <targetCurrency>PEN</targetCurrency>
//!   <exchangeRate>3.71214</exchangeRate>
//!   <pubDate>Wed, 6 Mar 2024 12:00:02 GMT</pubDate>
//! </item>
//! ```
//!
//! Only a handful of tags matter, so the feed is scanned with patterns rather
//! than parsed as a full XML tree.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::MarketDataError;
use crate::fetch::Fetcher;
use crate::models::{Quote, QuoteKind};
use crate::normalize::{parse_number, parse_timestamp};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "FLOATRATES";
const BASE_URL: &str = "https://www.floatrates.com/daily";

lazy_static! {
    static ref ITEM_RE: Regex = Regex::new(r"(?is)<item\b[^>]*>(.*?)</item>").unwrap();
    static ref TARGET_RE: Regex =
        Regex::new(r"(?is)<targetCurrency>\s*([^<]*?)\s*</targetCurrency>").unwrap();
    static ref RATE_RE: Regex =
        Regex::new(r"(?is)<exchangeRate>\s*([^<]*?)\s*</exchangeRate>").unwrap();
    static ref PUB_DATE_RE: Regex = Regex::new(r"(?is)<pubDate>\s*([^<]*?)\s*</pubDate>").unwrap();
}

pub struct FloatRatesProvider {
    fetcher: Arc<dyn Fetcher>,
    url: String,
    currency: String,
}

impl FloatRatesProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>, base: &str, currency: &str) -> Self {
        Self {
            fetcher,
            url: format!(
                "{}/{}.xml",
                BASE_URL,
                urlencoding::encode(&base.to_lowercase())
            ),
            currency: currency.to_uppercase(),
        }
    }
}

#[async_trait]
impl QuoteProvider for FloatRatesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::ExchangeRate
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let xml = self.fetcher.fetch_text(&self.url).await?;
        parse_floatrates_xml(&xml, &self.currency)
    }
}

/// Find the `<item>` whose `<targetCurrency>` matches and read its rate.
pub fn parse_floatrates_xml(xml: &str, currency: &str) -> Result<Quote, MarketDataError> {
    let block = ITEM_RE
        .captures_iter(xml)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .find(|block| {
            TARGET_RE
                .captures(block)
                .and_then(|c| c.get(1))
                .is_some_and(|m| m.as_str().eq_ignore_ascii_case(currency))
        })
        .ok_or_else(|| {
            MarketDataError::parse(
                PROVIDER_ID,
                format!("malformed document: no <item> for {}", currency),
            )
        })?;

    let raw = RATE_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            MarketDataError::parse(PROVIDER_ID, format!("no <exchangeRate> for {}", currency))
        })?;

    let rate = parse_number(raw).ok_or_else(|| {
        MarketDataError::parse(
            PROVIDER_ID,
            format!("{} rate '{}' is not a finite number", currency, raw),
        )
    })?;

    let observed_at = PUB_DATE_RE
        .captures(block)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_timestamp(m.as_str()))
        .unwrap_or_else(Utc::now);

    Ok(Quote::new(rate, PROVIDER_ID, observed_at))
}
