//! Forecasting stage — fit and persist a forecast for every processed
//! record on disk.
//!
//! Short histories are skipped (informational), model-fit failures are
//! caught per symbol; neither aborts the batch.

use crate::summary::StageSummary;
use marketflow_core::data::{ForecastStore, ProcessedStore, StoreError};
use marketflow_core::forecast::{forecast_closes, ForecastError, ForecastOutcome};
use thiserror::Error;

#[derive(Debug, Error)]
enum ForecastStageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Forecast every processed record `horizon_days` calendar days ahead.
pub fn run_forecasts(
    processed_store: &ProcessedStore,
    forecast_store: &ForecastStore,
    horizon_days: usize,
) -> Result<StageSummary, StoreError> {
    let symbols = processed_store.list()?;
    let total = symbols.len();
    println!("Found {total} processed records to forecast");

    let mut summary = StageSummary {
        total,
        ..Default::default()
    };

    for symbol in &symbols {
        match forecast_symbol(processed_store, forecast_store, symbol, horizon_days) {
            Ok(Some(rows)) => {
                println!("  OK: {symbol} ({rows} day forecast)");
                summary.succeeded += 1;
            }
            Ok(None) => {
                summary.skipped += 1;
            }
            Err(e) => {
                eprintln!("  FAIL: {symbol}: {e}");
                summary.failed += 1;
            }
        }
    }

    println!(
        "Forecasting complete: {}/{total} forecasted, {} skipped, {} failed",
        summary.succeeded, summary.skipped, summary.failed
    );
    Ok(summary)
}

fn forecast_symbol(
    processed_store: &ProcessedStore,
    forecast_store: &ForecastStore,
    symbol: &str,
    horizon_days: usize,
) -> Result<Option<usize>, ForecastStageError> {
    let df = processed_store.load(symbol)?;
    match forecast_closes(&df, horizon_days)? {
        ForecastOutcome::Forecast(points) => {
            forecast_store.write(symbol, &points)?;
            Ok(Some(points.len()))
        }
        ForecastOutcome::Skipped { observations } => {
            println!("  SKIP: {symbol} (only {observations} usable points)");
            Ok(None)
        }
    }
}
