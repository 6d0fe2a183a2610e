//! Resilient fetch layer — date-window computation, bounded retry with
//! linear backoff, and provider-frame projection.

use super::provider::{BarProvider, FetchError, ProviderFrame};
use crate::domain::{to_provider_symbol, RawBar};
use chrono::NaiveDate;
use std::time::Duration;

/// Retry policy for a single symbol's fetch.
#[derive(Debug, Clone)]
pub struct FetchPolicy {
    /// Total attempts per symbol (not additional retries).
    pub max_retries: u32,
    /// Backoff base: after failed attempt k the fetcher sleeps `retry_sleep * k`.
    pub retry_sleep: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_sleep: Duration::from_secs(2),
        }
    }
}

/// Result of a successful fetch call.
#[derive(Debug)]
pub enum FetchOutcome {
    Bars(Vec<RawBar>),
    /// The provider answered but had nothing usable (delisted/unknown symbol).
    NoData,
}

/// Fetches one symbol's history through a [`BarProvider`], absorbing
/// transient faults up to the configured retry bound.
pub struct Fetcher<'a> {
    provider: &'a dyn BarProvider,
    policy: FetchPolicy,
}

impl<'a> Fetcher<'a> {
    pub fn new(provider: &'a dyn BarProvider, policy: FetchPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch the trailing `window_years` of daily history ending today.
    pub fn fetch(&self, symbol: &str, window_years: u32) -> Result<FetchOutcome, FetchError> {
        let end = chrono::Local::now().date_naive();
        let start = end - chrono::Duration::days(365 * i64::from(window_years));
        self.fetch_range(symbol, start, end)
    }

    /// Fetch daily history for an explicit date range.
    ///
    /// Up to `max_retries` attempts. After failed attempt k (1-based, except
    /// the last) the fetcher sleeps `retry_sleep * k` — linear backoff. An
    /// empty response is `NoData` immediately, without burning retries.
    pub fn fetch_range(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchOutcome, FetchError> {
        let provider_symbol = to_provider_symbol(symbol);
        let attempts = self.policy.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.provider.request(&provider_symbol, start, end) {
                Ok(frame) => {
                    if frame.is_empty() {
                        return Ok(FetchOutcome::NoData);
                    }
                    let bars = frame.project(&provider_symbol);
                    if bars.is_empty() {
                        return Ok(FetchOutcome::NoData);
                    }
                    return Ok(FetchOutcome::Bars(bars));
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < attempts {
                        std::thread::sleep(self.policy.retry_sleep * attempt);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Other("no attempts made".into())))
    }
}
