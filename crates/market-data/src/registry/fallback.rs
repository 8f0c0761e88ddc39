//! Ordered fallback over a list of candidates.

use std::future::Future;

use crate::errors::{MarketDataError, ProviderFailure};

/// Try `attempt` on each candidate in order and return the first success.
///
/// Candidates after the first success are never attempted. When every
/// candidate fails, the failures are returned in attempt order, each labeled
/// with `label(candidate)`. An empty candidate list yields an empty failure
/// list.
pub async fn first_success<C, T, L, A, Fut>(
    candidates: impl IntoIterator<Item = C>,
    label: L,
    mut attempt: A,
) -> Result<T, Vec<ProviderFailure>>
where
    L: Fn(&C) -> String,
    A: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T, MarketDataError>>,
{
    let mut failures = Vec::new();

    for candidate in candidates {
        let name = label(&candidate);
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(e) => failures.push(ProviderFailure::new(name, e)),
        }
    }

    Err(failures)
}
