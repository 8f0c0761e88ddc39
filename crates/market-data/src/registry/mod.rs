//! Provider registry module.
//!
//! This module provides orchestration for quote providers, including:
//! - Ordered first-success fallback, shared by chains and mirrored providers
//! - Provider chains with fixed priority ordering
//! - Quote data validation
//! - Probe diagnostics for every provider in a chain

mod chain;
mod diagnostics;
mod fallback;
mod provider_registry;
mod validator;

pub use chain::ProviderChain;
pub use diagnostics::{FetchDiagnostics, ProviderAttempt};
pub use fallback::first_success;
pub use provider_registry::ProviderRegistry;
pub use validator::{QuoteValidator, ValidationIssue, ValidationSeverity, ValidatorConfig};
