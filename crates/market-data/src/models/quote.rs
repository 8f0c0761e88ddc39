use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The logical quantity a chain resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteKind {
    /// Silver spot price in USD per troy ounce.
    SilverPrice,
    /// Units of local currency per USD.
    ExchangeRate,
}

impl QuoteKind {
    /// Category label used as the prefix of aggregate failures.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SilverPrice => "silver price",
            Self::ExchangeRate => "exchange rate",
        }
    }
}

impl fmt::Display for QuoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One externally observed price or rate.
///
/// Produced by exactly one successful provider attempt. The chain only hands
/// out quotes whose `value` is finite and strictly positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// The observed price or rate
    pub value: f64,

    /// Provider id that produced the quote (STOOQ, OPEN_ER_API, etc.)
    pub source: String,

    /// When the provider says the value was observed, or fetch time if it doesn't say
    pub observed_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(value: f64, source: impl Into<String>, observed_at: DateTime<Utc>) -> Self {
        Self {
            value,
            source: source.into(),
            observed_at,
        }
    }
}
