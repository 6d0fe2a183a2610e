//! Data provider trait, response frames, and structured fetch errors.
//!
//! The `BarProvider` trait abstracts over upstream sources so the fetcher
//! and the pipeline tests can swap implementations. A provider performs one
//! request attempt per call — retry and backoff policy live in the
//! [`Fetcher`](crate::data::fetcher::Fetcher).

use crate::domain::RawBar;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

/// Structured error types for a single fetch attempt.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("HTTP {status} from provider")]
    HttpStatus { status: u16 },

    #[error("fetch error: {0}")]
    Other(String),
}

/// A provider response, before projection to a single symbol.
///
/// Upstream history endpoints are not consistent about shape: a
/// single-symbol request may come back date-indexed, or grouped under the
/// symbol the way batch endpoints respond. Modeling the two shapes as an
/// explicit variant keeps the normalization step an exhaustive match
/// instead of nested fallback handling.
#[derive(Debug, Clone)]
pub enum ProviderFrame {
    /// Date-indexed rows for a single symbol.
    Single(Vec<RawBar>),
    /// Rows grouped by provider symbol.
    BySymbol(BTreeMap<String, Vec<RawBar>>),
}

impl ProviderFrame {
    /// True when the frame holds no rows at all.
    pub fn is_empty(&self) -> bool {
        match self {
            ProviderFrame::Single(bars) => bars.is_empty(),
            ProviderFrame::BySymbol(groups) => groups.values().all(|bars| bars.is_empty()),
        }
    }

    /// Project the frame to one symbol's date-ordered rows.
    ///
    /// Key matching is tolerant: exact match, then ASCII case-insensitive
    /// match (providers are not consistent about key casing), then the
    /// outer level is dropped entirely and all groups merged. The result is
    /// sorted by date with duplicate dates removed (first wins).
    pub fn project(self, provider_symbol: &str) -> Vec<RawBar> {
        let mut bars = match self {
            ProviderFrame::Single(bars) => bars,
            ProviderFrame::BySymbol(mut groups) => {
                if let Some(bars) = groups.remove(provider_symbol) {
                    bars
                } else if let Some(key) = groups
                    .keys()
                    .find(|k| k.eq_ignore_ascii_case(provider_symbol))
                    .cloned()
                {
                    groups.remove(&key).unwrap_or_default()
                } else {
                    groups.into_values().flatten().collect()
                }
            }
        };
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        bars
    }
}

/// Trait for upstream bar sources (Yahoo Finance, test doubles).
///
/// One request attempt per call; implementations must not retry internally.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider (recorded in store metadata).
    fn name(&self) -> &str;

    /// Request daily bars for a provider-format symbol over a date range.
    fn request(
        &self,
        provider_symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ProviderFrame, FetchError>;
}

/// Per-symbol extraction outcome, for progress reporting.
#[derive(Debug)]
pub enum FetchReport {
    Saved { rows: usize },
    NoData,
    Failed(FetchError),
}

/// Progress callbacks for the extraction stage.
pub trait FetchProgress: Send {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol is skipped because its raw record already exists.
    fn on_skip(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, report: &FetchReport);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, skipped: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_skip(&self, symbol: &str, _index: usize, _total: usize) {
        println!("  SKIP: {symbol} (already exists)");
    }

    fn on_complete(&self, symbol: &str, _index: usize, _total: usize, report: &FetchReport) {
        match report {
            FetchReport::Saved { rows } => println!("  OK: {symbol} ({rows} bars)"),
            FetchReport::NoData => println!("  MISS: {symbol} (no data)"),
            FetchReport::Failed(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, skipped: usize, total: usize) {
        println!(
            "\nExtraction complete: {succeeded}/{total} saved, {failed} failed, {skipped} skipped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: Some(close - 1.0),
            high: Some(close + 1.0),
            low: Some(close - 2.0),
            close: Some(close),
            adj_close: Some(close),
            volume: Some(1_000),
        }
    }

    #[test]
    fn single_frame_projects_to_its_rows() {
        let frame = ProviderFrame::Single(vec![bar(3, 101.0), bar(2, 100.0)]);
        let bars = frame.project("BRK-B");
        assert_eq!(bars.len(), 2);
        // Sorted by date after projection
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn by_symbol_frame_exact_key_match() {
        let mut groups = BTreeMap::new();
        groups.insert("BRK-B".to_string(), vec![bar(2, 100.0)]);
        groups.insert("AAPL".to_string(), vec![bar(2, 200.0)]);
        let bars = ProviderFrame::BySymbol(groups).project("BRK-B");
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, Some(100.0));
    }

    #[test]
    fn by_symbol_frame_case_insensitive_fallback() {
        let mut groups = BTreeMap::new();
        groups.insert("brk-b".to_string(), vec![bar(2, 100.0)]);
        let bars = ProviderFrame::BySymbol(groups).project("BRK-B");
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn by_symbol_frame_drops_outer_level_when_no_key_matches() {
        let mut groups = BTreeMap::new();
        groups.insert("WHATEVER".to_string(), vec![bar(2, 100.0), bar(3, 101.0)]);
        let bars = ProviderFrame::BySymbol(groups).project("BRK-B");
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn projection_dedupes_duplicate_dates_first_wins() {
        let frame = ProviderFrame::Single(vec![bar(2, 100.0), bar(2, 999.0), bar(3, 101.0)]);
        let bars = frame.project("X");
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, Some(100.0));
    }

    #[test]
    fn empty_frames_report_empty() {
        assert!(ProviderFrame::Single(vec![]).is_empty());
        let mut groups = BTreeMap::new();
        groups.insert("X".to_string(), Vec::<RawBar>::new());
        assert!(ProviderFrame::BySymbol(groups).is_empty());
        assert!(!ProviderFrame::Single(vec![bar(2, 1.0)]).is_empty());
    }
}
