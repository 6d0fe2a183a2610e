//! Extraction stage — resilient fetch across the universe with rate-limit
//! pacing and skip-existing resumption.
//!
//! A symbol that yields no data (delisted, unknown) or exhausts its retries
//! is appended to the missing-symbol log and counted as a failure; the run
//! always continues with the remaining universe.

use crate::config::PacingConfig;
use crate::summary::StageSummary;
use marketflow_core::data::{
    FetchError, FetchOutcome, FetchProgress, FetchReport, Fetcher, MissingLog, RawStore, WriteMode,
};

/// Fetch raw history for every symbol, in universe order.
#[allow(clippy::too_many_arguments)]
pub fn run_extraction(
    symbols: &[&str],
    fetcher: &Fetcher<'_>,
    raw_store: &RawStore,
    missing_log: &MissingLog,
    window_years: u32,
    skip_existing: bool,
    pacing: &PacingConfig,
    progress: &dyn FetchProgress,
) -> StageSummary {
    let total = symbols.len();
    let mut summary = StageSummary {
        total,
        ..Default::default()
    };

    for (i, symbol) in symbols.iter().enumerate() {
        let position = i + 1;

        if skip_existing && raw_store.exists(symbol) {
            progress.on_skip(symbol, i, total);
            summary.skipped += 1;
            continue;
        }

        progress.on_start(symbol, i, total);

        let report = match fetcher.fetch(symbol, window_years) {
            Ok(FetchOutcome::Bars(bars)) => {
                match raw_store.write(symbol, &bars, WriteMode::Overwrite, fetcher.provider_name())
                {
                    Ok(_) => {
                        summary.succeeded += 1;
                        FetchReport::Saved { rows: bars.len() }
                    }
                    Err(e) => {
                        summary.failed += 1;
                        FetchReport::Failed(FetchError::Other(e.to_string()))
                    }
                }
            }
            Ok(FetchOutcome::NoData) => {
                record_miss(missing_log, symbol);
                summary.failed += 1;
                FetchReport::NoData
            }
            Err(e) => {
                record_miss(missing_log, symbol);
                summary.failed += 1;
                FetchReport::Failed(e)
            }
        };

        progress.on_complete(symbol, i, total, &report);

        // Polite throttling: a short delay after every request, a longer
        // pause every `batch_pause_every`-th universe position.
        std::thread::sleep(pacing.request_sleep());
        if pacing.batch_pause_every > 0 && position % pacing.batch_pause_every == 0 {
            println!(
                "Pausing {}s after {position} symbols to respect provider rate limits...",
                pacing.batch_pause_secs
            );
            std::thread::sleep(pacing.batch_pause());
        }
    }

    progress.on_batch_complete(summary.succeeded, summary.failed, summary.skipped, total);
    summary
}

fn record_miss(missing_log: &MissingLog, symbol: &str) {
    if let Err(e) = missing_log.append(symbol) {
        eprintln!("WARNING: could not append {symbol} to the missing log: {e}");
    }
}
