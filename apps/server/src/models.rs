use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use argentum_core::valuation::SilverValuation;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationConstants {
    pub grams: f64,
    pub grams_per_troy_ounce: f64,
    pub troy_ounces: f64,
    pub surcharge_rate: f64,
    pub source_currency: String,
    pub local_currency: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataSnapshot {
    pub silver_usd_per_ounce: f64,
    pub silver_source: String,
    pub silver_observed_at: DateTime<Utc>,
    pub exchange_rate: f64,
    pub exchange_rate_source: String,
    pub exchange_rate_observed_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub value_usd: f64,
    pub value_local: f64,
    pub value_local_with_surcharge: f64,
}

/// Body of `GET /api/v1/silver-value`.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SilverValueResponse {
    pub success: bool,
    pub computed_at: DateTime<Utc>,
    pub constants: ValuationConstants,
    pub market_data: MarketDataSnapshot,
    pub result: ValuationResult,
}

impl From<SilverValuation> for SilverValueResponse {
    fn from(v: SilverValuation) -> Self {
        Self {
            success: true,
            computed_at: v.computed_at,
            constants: ValuationConstants {
                grams: v.settings.grams,
                grams_per_troy_ounce: v.settings.grams_per_troy_ounce,
                troy_ounces: v.troy_ounces,
                surcharge_rate: v.settings.surcharge_rate,
                source_currency: v.settings.source_currency,
                local_currency: v.settings.local_currency,
            },
            market_data: MarketDataSnapshot {
                silver_usd_per_ounce: v.market_data.silver.value,
                silver_source: v.market_data.silver.source,
                silver_observed_at: v.market_data.silver.observed_at,
                exchange_rate: v.market_data.exchange_rate.value,
                exchange_rate_source: v.market_data.exchange_rate.source,
                exchange_rate_observed_at: v.market_data.exchange_rate.observed_at,
            },
            result: ValuationResult {
                value_usd: v.value.commodity_usd,
                value_local: v.value.local_no_surcharge,
                value_local_with_surcharge: v.value.local_with_surcharge,
            },
        }
    }
}
