//! Quote provider abstractions and implementations.
//!
//! This module contains:
//! - The `QuoteProvider` trait that all providers implement
//! - Silver price providers (Stooq, Gold API, metals.live, Metal Price API)
//! - Exchange rate providers (open.er-api, currency-api, FloatRates, BCRP)
//!
//! Each provider keeps its wire-format knowledge in a pure `parse_*` function
//! so parsing can be tested against captured payloads without the network.

mod traits;

// Silver price (USD per troy ounce)
pub mod gold_api;
pub mod metal_price_api;
pub mod metals_live;
pub mod stooq;

// Exchange rates (local currency per USD)
pub mod bcrp;
pub mod currency_api;
pub mod floatrates;
pub mod open_er_api;

pub use traits::QuoteProvider;
