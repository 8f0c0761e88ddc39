//! Ordered provider chain for one logical quantity.
//!
//! A chain tries its providers strictly one after another in declared order
//! and returns the first quote that passes validation. Providers are never
//! raced and results are never merged. Order is fixed at construction.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use super::{first_success, FetchDiagnostics, QuoteValidator};
use crate::errors::MarketDataError;
use crate::models::{Quote, QuoteKind};
use crate::provider::QuoteProvider;

pub struct ProviderChain {
    kind: QuoteKind,
    providers: Vec<Arc<dyn QuoteProvider>>,
    validator: QuoteValidator,
}

impl ProviderChain {
    pub fn new(kind: QuoteKind, providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self::with_validator(kind, providers, QuoteValidator::new())
    }

    pub fn with_validator(
        kind: QuoteKind,
        providers: Vec<Arc<dyn QuoteProvider>>,
        validator: QuoteValidator,
    ) -> Self {
        for provider in providers.iter().filter(|p| p.kind() != kind) {
            warn!(
                "Provider '{}' reports {} but was added to the {} chain",
                provider.id(),
                provider.kind(),
                kind
            );
        }

        Self {
            kind,
            providers,
            validator,
        }
    }

    pub fn kind(&self) -> QuoteKind {
        self.kind
    }

    /// Provider ids in attempt order.
    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// Resolve the quantity from the first provider that succeeds.
    ///
    /// A provider attempt fails on a fetch error, a parse error, or a quote
    /// rejected by the validator. When every provider fails the error is
    /// [`MarketDataError::AllProvidersFailed`] carrying each failure in
    /// attempt order.
    pub async fn resolve(&self) -> Result<Quote, MarketDataError> {
        let kind = self.kind;

        let result = first_success(
            self.providers.iter(),
            |provider: &&Arc<dyn QuoteProvider>| provider.id().to_string(),
            |provider| async move {
                let outcome = self.attempt(provider.as_ref()).await;
                if let Err(e) = &outcome {
                    warn!(
                        "Provider '{}' failed for {}: {}, trying next provider",
                        provider.id(),
                        kind,
                        e
                    );
                }
                outcome
            },
        )
        .await;

        match result {
            Ok(quote) => {
                info!(
                    "Resolved {} = {} from '{}' (observed {})",
                    kind, quote.value, quote.source, quote.observed_at
                );
                Ok(quote)
            }
            Err(failures) => {
                let error = MarketDataError::AllProvidersFailed { kind, failures };
                warn!("{}", error);
                Err(error)
            }
        }
    }

    /// Attempt every provider regardless of outcome and report each result.
    ///
    /// Diagnostic only; the valuation path uses [`ProviderChain::resolve`].
    pub async fn probe(&self) -> FetchDiagnostics {
        let mut diagnostics = FetchDiagnostics::new(self.kind);

        for provider in &self.providers {
            let started = Instant::now();
            let outcome = self.attempt(provider.as_ref()).await;
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

            match outcome {
                Ok(quote) => diagnostics.record_success(
                    provider.id(),
                    quote.value,
                    quote.observed_at,
                    elapsed_ms,
                ),
                Err(e) => diagnostics.record_error(provider.id(), e.to_string(), elapsed_ms),
            }
        }

        debug!("Probe {}: {}", self.kind, diagnostics.summary());
        diagnostics
    }

    async fn attempt(&self, provider: &dyn QuoteProvider) -> Result<Quote, MarketDataError> {
        debug!("Fetching {} from provider '{}'", self.kind, provider.id());
        let quote = provider.latest_quote().await?;
        self.validator.validate(&quote)?;
        Ok(quote)
    }
}
