//! Unit tests for valuation service.

use super::*;
use crate::errors::Error;
use argentum_market_data::{MarketDataError, ProviderChain, Quote, QuoteKind, QuoteProvider};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockProvider {
    id: &'static str,
    kind: QuoteKind,
    value: Option<f64>,
    delay: Duration,
}

impl MockProvider {
    fn new(id: &'static str, kind: QuoteKind, value: Option<f64>) -> Self {
        Self {
            id,
            kind,
            value,
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn kind(&self) -> QuoteKind {
        self.kind
    }

    async fn latest_quote(&self) -> std::result::Result<Quote, MarketDataError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.value {
            Some(value) => Ok(Quote::new(value, self.id, Utc::now())),
            None => Err(MarketDataError::parse(self.id, "Mock failure")),
        }
    }
}

fn chain(kind: QuoteKind, providers: Vec<MockProvider>) -> ProviderChain {
    ProviderChain::new(
        kind,
        providers
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn QuoteProvider>)
            .collect(),
    )
}

fn silver(value: Option<f64>) -> MockProvider {
    MockProvider::new("SILVER", QuoteKind::SilverPrice, value)
}

fn rate(value: Option<f64>) -> MockProvider {
    MockProvider::new("RATE", QuoteKind::ExchangeRate, value)
}

fn service(silver: Vec<MockProvider>, rates: Vec<MockProvider>) -> ValuationService {
    ValuationService::new(
        chain(QuoteKind::SilverPrice, silver),
        chain(QuoteKind::ExchangeRate, rates),
        ValuationSettings::default(),
    )
    .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_compute_valuation_end_to_end() {
    let service = service(vec![silver(Some(31.1034768))], vec![rate(Some(3.7))]);

    let valuation = service.compute_valuation().await.unwrap();

    assert_eq!(valuation.market_data.silver.source, "SILVER");
    assert_eq!(valuation.market_data.exchange_rate.value, 3.7);
    assert!((valuation.troy_ounces - 0.3086472).abs() < 1e-6);
    assert!((valuation.value.commodity_usd - 9.6).abs() < 1e-9);
    assert!((valuation.value.local_no_surcharge - 35.52).abs() < 1e-9);
    assert!((valuation.value.local_with_surcharge - 41.9136).abs() < 1e-9);
    assert_eq!(valuation.settings, ValuationSettings::default());
}

#[tokio::test]
async fn test_silver_failure_fails_whole_valuation() {
    let service = service(
        vec![
            MockProvider::new("S1", QuoteKind::SilverPrice, None),
            MockProvider::new("S2", QuoteKind::SilverPrice, None),
        ],
        vec![rate(Some(3.7))],
    );

    let err = service.compute_valuation().await.unwrap_err();
    let market_error = err.market_data().unwrap();
    assert!(market_error.is_exhausted());
    assert_eq!(market_error.failures().len(), 2);

    let text = err.to_string();
    assert!(text.contains("silver price: all providers failed"));
    assert!(text.contains("S1: Parse error: S1 - Mock failure"));
    assert!(text.contains("S2: Parse error: S2 - Mock failure"));
}

#[tokio::test]
async fn test_rate_failure_fails_whole_valuation() {
    let service = service(vec![silver(Some(24.0))], vec![rate(None)]);

    let err = service.compute_valuation().await.unwrap_err();
    assert!(err.to_string().contains("exchange rate: all providers failed"));
}

#[tokio::test]
async fn test_both_failing_reports_silver_error() {
    let service = service(vec![silver(None)], vec![rate(None)]);

    let err = service.compute_valuation().await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("silver price: all providers failed"));
    assert!(!text.contains("exchange rate"));
}

#[tokio::test(start_paused = true)]
async fn test_chains_resolve_concurrently() {
    let service = service(
        vec![silver(Some(24.0)).with_delay(Duration::from_secs(3))],
        vec![rate(Some(3.7)).with_delay(Duration::from_secs(1))],
    );

    let started = tokio::time::Instant::now();
    service.compute_valuation().await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(3));
    assert!(elapsed < Duration::from_millis(3500), "took {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_within_chain_is_sequential() {
    let service = service(
        vec![
            MockProvider::new("SLOW_FAIL", QuoteKind::SilverPrice, None)
                .with_delay(Duration::from_secs(2)),
            silver(Some(24.0)).with_delay(Duration::from_secs(2)),
        ],
        vec![rate(Some(3.7))],
    );

    let started = tokio::time::Instant::now();
    let valuation = service.compute_valuation().await.unwrap();

    assert_eq!(valuation.market_data.silver.source, "SILVER");
    assert!(started.elapsed() >= Duration::from_secs(4));
}

#[tokio::test]
async fn test_probe_reports_both_chains() {
    let service = service(
        vec![silver(Some(24.0)), MockProvider::new("S2", QuoteKind::SilverPrice, None)],
        vec![rate(Some(3.7))],
    );

    let diagnostics = service.probe_providers().await;
    assert_eq!(diagnostics.silver.attempts.len(), 2);
    assert!(diagnostics.silver.attempts[0].success);
    assert!(!diagnostics.silver.attempts[1].success);
    assert_eq!(diagnostics.exchange_rate.kind, QuoteKind::ExchangeRate);
    assert!(diagnostics.exchange_rate.has_success());
}

#[test]
fn test_new_rejects_invalid_settings_and_swapped_chains() {
    let err = ValuationService::new(
        chain(QuoteKind::SilverPrice, vec![]),
        chain(QuoteKind::ExchangeRate, vec![]),
        ValuationSettings {
            grams: -1.0,
            ..Default::default()
        },
    )
    .err()
    .unwrap();
    assert!(matches!(err, Error::InvalidConfigValue(_)));

    let err = ValuationService::new(
        chain(QuoteKind::ExchangeRate, vec![]),
        chain(QuoteKind::SilverPrice, vec![]),
        ValuationSettings::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, Error::InvalidConfigValue(_)));
}
