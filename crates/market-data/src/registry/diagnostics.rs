//! Per-provider attempt tracking for chain diagnostics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::QuoteKind;

/// Record of a single provider attempt during a probe.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub success: bool,
    pub value: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Outcome of attempting every provider in a chain.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchDiagnostics {
    pub kind: QuoteKind,
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new(kind: QuoteKind) -> Self {
        Self {
            kind,
            attempts: Vec::new(),
        }
    }

    pub fn record_success(
        &mut self,
        provider_id: &str,
        value: f64,
        observed_at: DateTime<Utc>,
        elapsed_ms: u64,
    ) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.to_string(),
            success: true,
            value: Some(value),
            observed_at: Some(observed_at),
            error: None,
            elapsed_ms,
        });
    }

    pub fn record_error(&mut self, provider_id: &str, error: String, elapsed_ms: u64) {
        self.attempts.push(ProviderAttempt {
            provider_id: provider_id.to_string(),
            success: false,
            value: None,
            observed_at: None,
            error: Some(error),
            elapsed_ms,
        });
    }

    /// Summary for logging/debugging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match (&a.value, &a.error) {
                (Some(value), _) if a.success => format!("{}: OK ({})", a.provider_id, value),
                (_, Some(err)) => format!("{}: ERROR ({})", a.provider_id, err),
                _ => format!("{}: UNKNOWN", a.provider_id),
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Check if any provider succeeded.
    pub fn has_success(&self) -> bool {
        self.attempts.iter().any(|a| a.success)
    }

    /// Get all errors.
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref().map(|e| (a.provider_id.as_str(), e)))
            .collect()
    }
}
