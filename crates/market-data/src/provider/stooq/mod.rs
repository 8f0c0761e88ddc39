//! Stooq provider for silver spot prices.
//!
//! Stooq publishes a lightweight CSV quote endpoint. With the `h` flag the
//! body carries a header row; without it only the data row. Either way the
//! last non-blank line holds the quote:
//!
//! ```text
//! Symbol,Date,Time,Open,High,Low,Close
//! XAGUSD,2024-03-06,22:59:58,24.08,24.37,23.92,24.31
//! ```
//!
//! Missing values are written as `N/D`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::MarketDataError;
use crate::fetch::Fetcher;
use crate::models::{Quote, QuoteKind};
use crate::normalize::{parse_number, parse_timestamp};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "STOOQ";
const BASE_URL: &str = "https://stooq.com/q/l/";
const SILVER_SYMBOL: &str = "xagusd";

const DATE_COLUMN: usize = 1;
const TIME_COLUMN: usize = 2;
const CLOSE_COLUMN: usize = 6;

pub struct StooqProvider {
    fetcher: Arc<dyn Fetcher>,
    url: String,
}

impl StooqProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            url: Self::quote_url(SILVER_SYMBOL),
        }
    }

    fn quote_url(symbol: &str) -> String {
        format!("{}?s={}&f=sd2t2ohlc&h&e=csv", BASE_URL, symbol)
    }
}

#[async_trait]
impl QuoteProvider for StooqProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::SilverPrice
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let body = self.fetcher.fetch_text(&self.url).await?;
        parse_stooq_csv(&body)
    }
}

/// Parse the last non-blank CSV line into a quote using the close column.
pub fn parse_stooq_csv(body: &str) -> Result<Quote, MarketDataError> {
    let line = body
        .lines()
        .map(str::trim)
        .rev()
        .find(|l| !l.is_empty())
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "empty response"))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    let record = reader
        .records()
        .next()
        .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "no CSV record"))?
        .map_err(|e| MarketDataError::parse(PROVIDER_ID, format!("invalid CSV: {}", e)))?;

    let close_raw = record.get(CLOSE_COLUMN).ok_or_else(|| {
        MarketDataError::parse(
            PROVIDER_ID,
            format!(
                "expected at least {} columns, got {}",
                CLOSE_COLUMN + 1,
                record.len()
            ),
        )
    })?;

    let close = parse_number(close_raw).ok_or_else(|| {
        MarketDataError::parse(
            PROVIDER_ID,
            format!("close '{}' is not a finite number", close_raw),
        )
    })?;

    let observed_at = match (record.get(DATE_COLUMN), record.get(TIME_COLUMN)) {
        (Some(date), Some(time)) => {
            parse_timestamp(&format!("{} {}", date, time)).or_else(|| parse_timestamp(date))
        }
        (Some(date), None) => parse_timestamp(date),
        _ => None,
    }
    .unwrap_or_else(Utc::now);

    Ok(Quote::new(close, PROVIDER_ID, observed_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StaticFetcher;
    use chrono::TimeZone;

    const WITH_HEADER: &str = "Symbol,Date,Time,Open,High,Low,Close\r\n\
                               XAGUSD,2024-03-06,22:59:58,24.08,24.37,23.92,24.31\r\n";

    #[test]
    fn test_parses_last_line_with_header() {
        let quote = parse_stooq_csv(WITH_HEADER).unwrap();
        assert_eq!(quote.value, 24.31);
        assert_eq!(quote.source, "STOOQ");
        assert_eq!(
            quote.observed_at,
            Utc.with_ymd_and_hms(2024, 3, 6, 22, 59, 58).unwrap()
        );
    }

    #[test]
    fn test_parses_without_header_and_trailing_blank_lines() {
        let body = "XAGUSD,2024-03-06,22:59:58,24.08,24.37,23.92,24.31\n\n   \n";
        let quote = parse_stooq_csv(body).unwrap();
        assert_eq!(quote.value, 24.31);
    }

    #[test]
    fn test_missing_data_marker_fails() {
        let body = "Symbol,Date,Time,Open,High,Low,Close\nXAGUSD,N/D,N/D,N/D,N/D,N/D,N/D\n";
        let err = parse_stooq_csv(body).unwrap_err();
        assert!(err.to_string().contains("not a finite number"));
    }

    #[test]
    fn test_header_only_fails() {
        let err = parse_stooq_csv("Symbol,Date,Time,Open,High,Low,Close\n").unwrap_err();
        assert!(matches!(err, MarketDataError::Parse { .. }));
    }

    #[test]
    fn test_short_row_and_empty_body_fail() {
        assert!(parse_stooq_csv("XAGUSD,2024-03-06,24.31").is_err());
        assert!(parse_stooq_csv("\n\n").is_err());
    }

    #[tokio::test]
    async fn test_latest_quote_fetches_csv_endpoint() {
        let url = StooqProvider::quote_url(SILVER_SYMBOL);
        let fetcher = Arc::new(StaticFetcher::new().with_body(&url, WITH_HEADER));
        let provider = StooqProvider::new(fetcher.clone());

        let quote = provider.latest_quote().await.unwrap();
        assert_eq!(quote.value, 24.31);
        assert_eq!(fetcher.calls(), vec![url]);
    }

    #[tokio::test]
    async fn test_http_error_is_fetch_error() {
        let url = StooqProvider::quote_url(SILVER_SYMBOL);
        let fetcher = Arc::new(StaticFetcher::new().with_status(&url, 500));
        let provider = StooqProvider::new(fetcher);

        let err = provider.latest_quote().await.unwrap_err();
        assert!(matches!(err, MarketDataError::Fetch(_)));
    }
}
