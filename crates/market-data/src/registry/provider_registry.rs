//! Default provider chains.
//!
//! Builds the two fixed priority lists used for a valuation:
//! - silver price: Stooq, Gold API, metals.live, then Metal Price API when a key is set
//! - exchange rate: open.er-api, currency-api, FloatRates, then BCRP when the
//!   local currency is PEN

use std::sync::Arc;

use log::info;

use super::ProviderChain;
use crate::fetch::Fetcher;
use crate::models::QuoteKind;
use crate::provider::bcrp::BcrpProvider;
use crate::provider::currency_api::CurrencyApiProvider;
use crate::provider::floatrates::FloatRatesProvider;
use crate::provider::gold_api::GoldApiProvider;
use crate::provider::metal_price_api::MetalPriceApiProvider;
use crate::provider::metals_live::MetalsLiveProvider;
use crate::provider::open_er_api::OpenErApiProvider;
use crate::provider::stooq::StooqProvider;
use crate::provider::QuoteProvider;

/// Currency all silver providers quote in.
const SOURCE_CURRENCY: &str = "USD";

/// The silver and exchange-rate chains for one deployment.
pub struct ProviderRegistry {
    pub silver: ProviderChain,
    pub exchange_rate: ProviderChain,
}

impl ProviderRegistry {
    /// Build both chains on a shared fetcher.
    ///
    /// `metal_price_api_key` enables the keyed silver provider; a blank key
    /// counts as unset.
    pub fn default_chains(
        fetcher: Arc<dyn Fetcher>,
        local_currency: &str,
        metal_price_api_key: Option<&str>,
    ) -> Self {
        let local_currency = local_currency.trim().to_uppercase();

        let mut silver: Vec<Arc<dyn QuoteProvider>> = vec![
            Arc::new(StooqProvider::new(fetcher.clone())),
            Arc::new(GoldApiProvider::new(fetcher.clone())),
            Arc::new(MetalsLiveProvider::new(fetcher.clone())),
        ];
        if let Some(key) = metal_price_api_key.map(str::trim).filter(|k| !k.is_empty()) {
            silver.push(Arc::new(MetalPriceApiProvider::new(
                fetcher.clone(),
                key.to_string(),
            )));
        }

        let mut exchange_rate: Vec<Arc<dyn QuoteProvider>> = vec![
            Arc::new(OpenErApiProvider::new(
                fetcher.clone(),
                SOURCE_CURRENCY,
                &local_currency,
            )),
            Arc::new(CurrencyApiProvider::new(
                fetcher.clone(),
                SOURCE_CURRENCY,
                &local_currency,
            )),
            Arc::new(FloatRatesProvider::new(
                fetcher.clone(),
                SOURCE_CURRENCY,
                &local_currency,
            )),
        ];
        if local_currency == "PEN" {
            exchange_rate.push(Arc::new(BcrpProvider::new(fetcher)));
        }

        let registry = Self {
            silver: ProviderChain::new(QuoteKind::SilverPrice, silver),
            exchange_rate: ProviderChain::new(QuoteKind::ExchangeRate, exchange_rate),
        };

        info!(
            "Provider chains: {} = {:?}; {} ({}/{}) = {:?}",
            QuoteKind::SilverPrice,
            registry.silver.provider_ids(),
            QuoteKind::ExchangeRate,
            SOURCE_CURRENCY,
            local_currency,
            registry.exchange_rate.provider_ids()
        );

        registry
    }
}
