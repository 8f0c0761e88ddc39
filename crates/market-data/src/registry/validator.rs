//! Quote data validation.
//!
//! Validates quotes from providers before a chain hands them out:
//! - Value must be finite and strictly positive (hard failure)
//! - Observation time should be recent and not in the future (soft warning)

use chrono::{Duration, Utc};
use log::warn;

use crate::errors::MarketDataError;
use crate::models::Quote;

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - reject quote, try next provider.
    Hard,
    /// Soft warning - accept quote but log warning.
    Soft,
}

/// Validation result details.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Description of the issue.
    pub message: String,
}

/// Quote validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Quotes observed longer ago than this are logged as stale.
    pub max_age: Duration,
    /// Quotes observed further in the future than this are logged.
    pub max_future_skew: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::days(7),
            max_future_skew: Duration::minutes(5),
        }
    }
}

/// Quote data validator.
#[derive(Clone, Debug, Default)]
pub struct QuoteValidator {
    config: ValidatorConfig,
}

impl QuoteValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a quote.
    ///
    /// Returns `Err(InvalidValue)` on any hard issue. Soft issues are logged
    /// and the quote is accepted.
    pub fn validate(&self, quote: &Quote) -> Result<(), MarketDataError> {
        let issues = self.issues(quote);

        let errors: Vec<_> = issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Hard)
            .map(|i| i.message.as_str())
            .collect();

        if !errors.is_empty() {
            return Err(MarketDataError::InvalidValue {
                provider: quote.source.clone(),
                message: errors.join("; "),
            });
        }

        for issue in issues.iter().filter(|i| i.severity == ValidationSeverity::Soft) {
            warn!("Quote validation warning for '{}': {}", quote.source, issue.message);
        }

        Ok(())
    }

    /// Every issue found on `quote`, hard and soft.
    pub fn issues(&self, quote: &Quote) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        self.validate_value(quote, &mut issues);
        self.validate_freshness(quote, &mut issues);
        issues
    }

    fn validate_value(&self, quote: &Quote, issues: &mut Vec<ValidationIssue>) {
        if !quote.value.is_finite() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Non-finite value: {}", quote.value),
            });
        } else if quote.value <= 0.0 {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: format!("Non-positive value: {}", quote.value),
            });
        }
    }

    fn validate_freshness(&self, quote: &Quote, issues: &mut Vec<ValidationIssue>) {
        let age = Utc::now() - quote.observed_at;

        if age > self.config.max_age {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!("Stale quote observed {} days ago", age.num_days()),
            });
        } else if -age > self.config.max_future_skew {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: format!("Quote observed in the future: {}", quote.observed_at),
            });
        }
    }
}
