//! Valuation service traits.

use async_trait::async_trait;

use super::valuation_model::{ProviderDiagnostics, SilverValuation};
use crate::errors::Result;

/// Trait defining the contract for valuation service operations.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Resolve both quotes from live providers and compute the valuation.
    ///
    /// Fails as a whole when either quote cannot be resolved.
    async fn compute_valuation(&self) -> Result<SilverValuation>;

    /// Attempt every provider of both chains and report each outcome.
    async fn probe_providers(&self) -> ProviderDiagnostics;
}
