//! Core error types for the Argentum service.

use thiserror::Error;

use argentum_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for valuation.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Valuation calculation failed: {0}")]
    Calculation(String),
}

impl Error {
    /// The market data error behind this error, if any.
    pub fn market_data(&self) -> Option<&MarketDataError> {
        match self {
            Self::MarketData(e) => Some(e),
            _ => None,
        }
    }
}
