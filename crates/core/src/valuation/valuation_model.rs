//! Silver valuation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use argentum_market_data::{FetchDiagnostics, Quote};

use crate::constants::{
    DEFAULT_LOCAL_CURRENCY, DEFAULT_SILVER_GRAMS, DEFAULT_SURCHARGE_RATE, GRAMS_PER_TROY_OUNCE,
    SOURCE_CURRENCY,
};
use crate::errors::{Error, Result};

/// Fixed inputs of a valuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValuationSettings {
    pub grams: f64,
    pub grams_per_troy_ounce: f64,
    pub surcharge_rate: f64,
    pub source_currency: String,
    pub local_currency: String,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            grams: DEFAULT_SILVER_GRAMS,
            grams_per_troy_ounce: GRAMS_PER_TROY_OUNCE,
            surcharge_rate: DEFAULT_SURCHARGE_RATE,
            source_currency: SOURCE_CURRENCY.to_string(),
            local_currency: DEFAULT_LOCAL_CURRENCY.to_string(),
        }
    }
}

impl ValuationSettings {
    /// Quantity of silver in troy ounces.
    pub fn troy_ounces(&self) -> f64 {
        self.grams / self.grams_per_troy_ounce
    }

    /// Reject settings that cannot produce a meaningful value.
    pub fn validate(&self) -> Result<()> {
        if !self.grams.is_finite() || self.grams <= 0.0 {
            return Err(Error::InvalidConfigValue(format!(
                "grams must be a positive number, got {}",
                self.grams
            )));
        }
        if !self.grams_per_troy_ounce.is_finite() || self.grams_per_troy_ounce <= 0.0 {
            return Err(Error::InvalidConfigValue(format!(
                "grams per troy ounce must be a positive number, got {}",
                self.grams_per_troy_ounce
            )));
        }
        if !self.surcharge_rate.is_finite() || self.surcharge_rate < 0.0 {
            return Err(Error::InvalidConfigValue(format!(
                "surcharge rate must be zero or more, got {}",
                self.surcharge_rate
            )));
        }
        for code in [&self.source_currency, &self.local_currency] {
            if !is_currency_code(code) {
                return Err(Error::InvalidConfigValue(format!(
                    "'{}' is not a 3-letter currency code",
                    code
                )));
            }
        }
        Ok(())
    }
}

fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Values derived from one quote pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedValue {
    /// Value of the silver in the source currency
    pub commodity_usd: f64,
    /// Value in local currency before surcharge
    pub local_no_surcharge: f64,
    /// Value in local currency including the surcharge
    pub local_with_surcharge: f64,
}

impl DerivedValue {
    pub fn is_finite(&self) -> bool {
        self.commodity_usd.is_finite()
            && self.local_no_surcharge.is_finite()
            && self.local_with_surcharge.is_finite()
    }
}

/// The two quotes a valuation was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub silver: Quote,
    pub exchange_rate: Quote,
}

/// A complete valuation result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SilverValuation {
    pub computed_at: DateTime<Utc>,
    pub settings: ValuationSettings,
    pub troy_ounces: f64,
    pub market_data: MarketData,
    pub value: DerivedValue,
}

/// Probe results for both chains.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDiagnostics {
    pub silver: FetchDiagnostics,
    pub exchange_rate: FetchDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = ValuationSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.local_currency, "PEN");
        assert!((settings.troy_ounces() - 0.3086472).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_settings() {
        let cases = [
            ValuationSettings {
                grams: 0.0,
                ..Default::default()
            },
            ValuationSettings {
                grams: f64::NAN,
                ..Default::default()
            },
            ValuationSettings {
                surcharge_rate: -0.1,
                ..Default::default()
            },
            ValuationSettings {
                local_currency: "SOLES".to_string(),
                ..Default::default()
            },
            ValuationSettings {
                local_currency: "P3N".to_string(),
                ..Default::default()
            },
        ];

        for settings in cases {
            let err = settings.validate().unwrap_err();
            assert!(matches!(err, Error::InvalidConfigValue(_)), "{:?}", settings);
        }
    }

    #[test]
    fn test_zero_surcharge_is_allowed() {
        let settings = ValuationSettings {
            surcharge_rate: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }
}
