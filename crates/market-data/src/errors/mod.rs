//! Error types for the market data crate.
//!
//! This module provides:
//! - [`FetchError`]: a single outbound request failed (network, status, timeout, body)
//! - [`MarketDataError`]: a provider attempt, a mirror set, or a whole chain failed
//! - [`ProviderFailure`]: one `(provider, reason)` pair kept for diagnostics

mod failure;

pub use failure::{render_failures, ProviderFailure};

use std::time::Duration;

use thiserror::Error;

use crate::models::QuoteKind;

/// Errors raised by the bounded fetcher for one outbound request.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not finish within the fetch timeout and was cancelled.
    #[error("Timeout after {}ms: {url}", .after.as_millis())]
    Timeout {
        /// The requested URL
        url: String,
        /// The timeout that elapsed
        after: Duration,
    },

    /// The server answered with a non-success status. The body is not read.
    #[error("HTTP {status}: {url}")]
    HttpStatus {
        /// The requested URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// Connection, TLS or transport failure.
    #[error("Network error: {url} - {message}")]
    Network { url: String, message: String },

    /// The body could not be read or decoded in the requested mode.
    #[error("Invalid response body: {url} - {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status for [`FetchError::HttpStatus`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Replace `secret` with `***` wherever it appears in the error text.
    pub fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let scrub = |s: String| s.replace(secret, "***");
        match self {
            Self::Timeout { url, after } => Self::Timeout {
                url: scrub(url),
                after,
            },
            Self::HttpStatus { url, status } => Self::HttpStatus {
                url: scrub(url),
                status,
            },
            Self::Network { url, message } => Self::Network {
                url: scrub(url),
                message: scrub(message),
            },
            Self::Decode { url, message } => Self::Decode {
                url: scrub(url),
                message: scrub(message),
            },
        }
    }
}

/// Errors that can occur while acquiring a quote.
///
/// `Fetch` and `Parse` are local to one provider attempt and make the chain
/// fall through to the next provider. `AllProvidersFailed` is terminal for a
/// chain and carries every underlying failure in attempt order.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The outbound request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The response did not have the shape the provider expects.
    #[error("Parse error: {provider} - {message}")]
    Parse { provider: String, message: String },

    /// The provider produced a value that failed validation (non-finite or not positive).
    #[error("Validation failed: {provider} - {message}")]
    InvalidValue { provider: String, message: String },

    /// Every mirror endpoint of a single provider failed.
    #[error("All mirrors failed: {provider} - {}", render_failures(.failures))]
    MirrorsExhausted {
        provider: String,
        failures: Vec<ProviderFailure>,
    },

    /// Every provider in a chain failed.
    #[error("{kind}: all providers failed: {}", render_failures(.failures))]
    AllProvidersFailed {
        kind: QuoteKind,
        failures: Vec<ProviderFailure>,
    },
}

impl MarketDataError {
    /// Shorthand for a [`MarketDataError::Parse`] labeled with `provider`.
    pub fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns true for chain exhaustion.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::AllProvidersFailed { .. })
    }

    /// Structured failures carried by aggregate errors, in attempt order.
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            Self::MirrorsExhausted { failures, .. } | Self::AllProvidersFailed { failures, .. } => {
                failures
            }
            _ => &[],
        }
    }
}
