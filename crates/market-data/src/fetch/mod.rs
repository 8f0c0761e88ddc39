//! Bounded outbound fetching.
//!
//! Providers never talk to `reqwest` directly. They go through a [`Fetcher`],
//! which performs exactly one request per call, under a hard timeout, and
//! reports failures as [`FetchError`]. Tests substitute an in-memory fetcher.

mod http;

pub use http::{HttpFetcher, DEFAULT_FETCH_TIMEOUT, USER_AGENT};

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::FetchError;

/// How the caller intends to read the response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseMode {
    Json,
    Text,
}

impl ResponseMode {
    /// `Accept` header value sent for this mode.
    pub fn accept(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Text => "text/csv, text/plain, application/xml, text/xml;q=0.9, */*;q=0.8",
        }
    }
}

/// Performs a single outbound request and returns the raw body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` once. No retries.
    async fn fetch(&self, url: &str, mode: ResponseMode) -> Result<String, FetchError>;

    /// Fetch `url` and decode the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let body = self.fetch(url, ResponseMode::Json).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Fetch `url` as raw text (CSV, XML, plain).
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch(url, ResponseMode::Text).await
    }
}
