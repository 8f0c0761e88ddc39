//! Quote provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Quote, QuoteKind};

/// One external data source plus the parser for its response shape.
///
/// Implementations fetch through a shared [`Fetcher`](crate::fetch::Fetcher)
/// and turn every structural surprise into a [`MarketDataError`]; they must
/// never panic on a malformed payload, since that would abort the whole chain.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use argentum_market_data::provider::QuoteProvider;
///
/// struct FixedSilver;
///
/// #[async_trait]
/// impl QuoteProvider for FixedSilver {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     fn kind(&self) -> QuoteKind {
///         QuoteKind::SilverPrice
///     }
///
///     async fn latest_quote(&self) -> Result<Quote, MarketDataError> {
///         Ok(Quote::new(24.0, "FIXED", Utc::now()))
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "STOOQ", "OPEN_ER_API", etc.
    /// Used as the quote source label and in failure diagnostics.
    fn id(&self) -> &'static str;

    /// The quantity this provider reports.
    fn kind(&self) -> QuoteKind;

    /// Fetch and parse the latest value.
    async fn latest_quote(&self) -> Result<Quote, MarketDataError>;
}
