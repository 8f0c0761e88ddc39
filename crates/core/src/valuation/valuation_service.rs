//! Silver valuation service implementation.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};

use argentum_market_data::{ProviderChain, ProviderRegistry, QuoteKind};

use super::valuation_calculator::calculate_derived_value;
use super::valuation_model::{MarketData, ProviderDiagnostics, SilverValuation, ValuationSettings};
use super::valuation_traits::ValuationServiceTrait;
use crate::errors::{Error, Result};

/// Resolves the silver price and the exchange rate and values the configured
/// quantity of silver. Holds no state between calls; every valuation
/// re-fetches live data.
pub struct ValuationService {
    silver: ProviderChain,
    exchange_rate: ProviderChain,
    settings: ValuationSettings,
}

impl ValuationService {
    /// Creates a new ValuationService instance.
    ///
    /// Fails when the settings are invalid or the chains are swapped.
    pub fn new(
        silver: ProviderChain,
        exchange_rate: ProviderChain,
        settings: ValuationSettings,
    ) -> Result<Self> {
        settings.validate()?;

        if silver.kind() != QuoteKind::SilverPrice || exchange_rate.kind() != QuoteKind::ExchangeRate
        {
            return Err(Error::InvalidConfigValue(format!(
                "expected ({}, {}) chains, got ({}, {})",
                QuoteKind::SilverPrice,
                QuoteKind::ExchangeRate,
                silver.kind(),
                exchange_rate.kind()
            )));
        }

        Ok(Self {
            silver,
            exchange_rate,
            settings,
        })
    }

    /// Build the service on the default provider chains.
    pub fn from_registry(registry: ProviderRegistry, settings: ValuationSettings) -> Result<Self> {
        Self::new(registry.silver, registry.exchange_rate, settings)
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn compute_valuation(&self) -> Result<SilverValuation> {
        // Both chains are polled concurrently; attempts within a chain stay sequential.
        let (silver, exchange_rate) =
            tokio::join!(self.silver.resolve(), self.exchange_rate.resolve());

        let (silver, exchange_rate) = match (silver, exchange_rate) {
            (Ok(silver), Ok(exchange_rate)) => (silver, exchange_rate),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e.into()),
            (Err(silver_error), Err(rate_error)) => {
                warn!("Exchange rate chain also failed: {}", rate_error);
                return Err(silver_error.into());
            }
        };

        let value = calculate_derived_value(silver.value, exchange_rate.value, &self.settings);
        if !value.is_finite() {
            return Err(Error::Calculation(format!(
                "non-finite result from silver {} and rate {}",
                silver.value, exchange_rate.value
            )));
        }

        debug!(
            "Valued {} g of silver at {} {} (silver from '{}', rate from '{}')",
            self.settings.grams,
            value.local_with_surcharge,
            self.settings.local_currency,
            silver.source,
            exchange_rate.source
        );

        Ok(SilverValuation {
            computed_at: Utc::now(),
            settings: self.settings.clone(),
            troy_ounces: self.settings.troy_ounces(),
            market_data: MarketData {
                silver,
                exchange_rate,
            },
            value,
        })
    }

    async fn probe_providers(&self) -> ProviderDiagnostics {
        let (silver, exchange_rate) = tokio::join!(self.silver.probe(), self.exchange_rate.probe());
        ProviderDiagnostics {
            silver,
            exchange_rate,
        }
    }
}
