//! Argentum Core - valuation domain models and services.
//!
//! This crate turns the two live quotes resolved by `argentum-market-data`
//! (silver in USD per troy ounce, USD to local currency) into the value of a
//! fixed quantity of silver, with and without a surcharge.

pub mod constants;
pub mod errors;
pub mod valuation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
