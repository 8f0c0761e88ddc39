//! BCRP (Banco Central de Reserva del Perú) statistical series provider.
//!
//! Serves the interbank USD/PEN sell rate as a CSV export. The export uses
//! `<br>` as a line separator, Spanish headers that vary between series, and
//! `n.d.` for days without data:
//!
//! ```text
//! "Fecha","Tipo de cambio - TC Interbancario (S/ por US$) - Venta"<br>
//! "05.Mar.24","3.795"<br>"06.Mar.24","n.d."<br>
//! ```
//!
//! Columns are located by fuzzy header matching. Rows are read from the most
//! recent upward and the first row carrying a finite value wins.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::MarketDataError;
use crate::fetch::Fetcher;
use crate::models::{Quote, QuoteKind};
use crate::normalize::{parse_number, parse_timestamp};
use crate::provider::QuoteProvider;

const PROVIDER_ID: &str = "BCRP";
const BASE_URL: &str = "https://estadisticas.bcrp.gob.pe/estadisticas/series/api";
/// Interbank exchange rate, sell side (S/ per US$).
const SERIES_CODE: &str = "PD04640PD";
const LOOKBACK_DAYS: i64 = 14;

const VALUE_HEADERS: &[&str] = &[
    "valor",
    "value",
    "venta",
    "compra",
    "tipo de cambio",
    "precio",
    "price",
    "rate",
    "close",
    "cierre",
];
const DATE_HEADERS: &[&str] = &["fecha", "date", "periodo", "period", "dia", "time"];

lazy_static! {
    static ref BR_RE: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
}

pub struct BcrpProvider {
    fetcher: Arc<dyn Fetcher>,
}

impl BcrpProvider {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// CSV export URL covering the last two weeks up to `today`.
    fn series_url(&self, today: NaiveDate) -> String {
        let start = today - Duration::days(LOOKBACK_DAYS);
        format!(
            "{}/{}/csv/{}/{}",
            BASE_URL,
            SERIES_CODE,
            start.format("%Y-%m-%d"),
            today.format("%Y-%m-%d")
        )
    }
}

#[async_trait]
impl QuoteProvider for BcrpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn kind(&self) -> QuoteKind {
        QuoteKind::ExchangeRate
    }

    async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
        let url = self.series_url(Utc::now().date_naive());
        let body = self.fetcher.fetch_text(&url).await?;
        parse_bcrp_csv(&body)
    }
}

/// Extract the most recent finite observation from a BCRP CSV export.
pub fn parse_bcrp_csv(body: &str) -> Result<Quote, MarketDataError> {
    let normalized = BR_RE.replace_all(body, "\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(normalized.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| MarketDataError::parse(PROVIDER_ID, format!("unreadable header: {}", e)))?
        .iter()
        .map(fold_header)
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(MarketDataError::parse(PROVIDER_ID, "empty document"));
    }

    let date_col = find_column(&headers, DATE_HEADERS, None);
    let value_col = find_column(&headers, VALUE_HEADERS, date_col);

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .map_err(|e| MarketDataError::parse(PROVIDER_ID, format!("unreadable row: {}", e)))?;

    for row in rows.iter().rev() {
        let value = match value_col {
            Some(col) => row.get(col).and_then(parse_number),
            None => scan_row_for_value(row, date_col),
        };

        if let Some(value) = value {
            let observed_at = date_col
                .and_then(|col| row.get(col))
                .and_then(parse_timestamp)
                .unwrap_or_else(Utc::now);
            return Ok(Quote::new(value, PROVIDER_ID, observed_at));
        }
    }

    Err(MarketDataError::parse(
        PROVIDER_ID,
        format!("no finite value in {} rows", rows.len()),
    ))
}

/// Lower-case, strip quotes and fold Spanish accents so `Período` matches `periodo`.
fn fold_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('"')
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

fn find_column(headers: &[String], keywords: &[&str], exclude: Option<usize>) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| Some(*idx) != exclude)
        .find(|(_, header)| keywords.iter().any(|k| header.contains(k)))
        .map(|(idx, _)| idx)
}

/// Rightmost finite cell of `row`, ignoring the date column.
fn scan_row_for_value(row: &csv::StringRecord, date_col: Option<usize>) -> Option<f64> {
    (0..row.len())
        .rev()
        .filter(|idx| Some(*idx) != date_col)
        .find_map(|idx| row.get(idx).and_then(parse_number))
}
