//! Argentum Market Data Crate
//!
//! This crate provides provider-agnostic quote fetching for the Argentum
//! silver valuation service.
//!
//! # Overview
//!
//! Two logical quantities are resolved, each from an ordered list of
//! independent public sources:
//! - Silver spot price in USD per troy ounce
//! - USD to local currency exchange rate
//!
//! Every source speaks its own wire format (keyed JSON, arrays, CSV, XML) and
//! its own number and timestamp conventions. Each provider normalizes its
//! response into a [`Quote`]; a [`ProviderChain`] returns the first valid one.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  ProviderChain   |  (strict priority order, first success wins)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |  QuoteProvider   |  (Stooq, Gold API, open.er-api, BCRP, etc.)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |     Fetcher      | --> |    normalize     |  (numbers, timestamps)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |      Quote       |  (value, source, observed_at)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - One observed price or rate
//! - [`QuoteKind`] - Which quantity a chain resolves
//! - [`QuoteProvider`] - One external source plus its parser
//! - [`Fetcher`] - Bounded single-request fetching
//! - [`MarketDataError`] - Attempt, mirror and chain failures

pub mod errors;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod registry;

pub use errors::{FetchError, MarketDataError, ProviderFailure};
pub use fetch::{Fetcher, HttpFetcher, ResponseMode, DEFAULT_FETCH_TIMEOUT};
pub use models::{Quote, QuoteKind};
pub use provider::QuoteProvider;
pub use registry::{FetchDiagnostics, ProviderAttempt, ProviderChain, ProviderRegistry, QuoteValidator};
