//! Silver valuation module.
//!
//! This module resolves the two live quotes concurrently and derives the
//! value of the configured quantity of silver in local currency.

mod valuation_calculator;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

pub use valuation_calculator::*;
pub use valuation_model::*;
pub use valuation_service::*;
pub use valuation_traits::*;

#[cfg(test)]
mod valuation_service_tests;
