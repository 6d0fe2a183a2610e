//! Transformation stage — normalize and enrich every raw record on disk.
//!
//! The stage covers whatever the raw store holds, not the configured
//! universe: a rerun picks up records fetched by earlier, interrupted runs.
//! A schema error aborts that symbol only.

use crate::summary::StageSummary;
use marketflow_core::data::{ProcessedStore, RawStore, StoreError};
use marketflow_core::indicators::enrich;
use marketflow_core::normalize::{normalize, SchemaError};
use thiserror::Error;

#[derive(Debug, Error)]
enum TransformError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Process all raw records into processed records.
///
/// Fails only on configuration-level faults (an unreadable store
/// directory); per-symbol errors are counted and logged.
pub fn run_transformation(
    raw_store: &RawStore,
    processed_store: &ProcessedStore,
) -> Result<StageSummary, StoreError> {
    let symbols = raw_store.list()?;
    let total = symbols.len();
    println!("Found {total} raw records to process");

    let mut summary = StageSummary {
        total,
        ..Default::default()
    };

    for symbol in &symbols {
        match process_symbol(raw_store, processed_store, symbol) {
            Ok(rows) => {
                println!("  OK: {symbol} ({rows} rows)");
                summary.succeeded += 1;
            }
            Err(e) => {
                eprintln!("  FAIL: {symbol}: {e}");
                summary.failed += 1;
            }
        }
    }

    println!(
        "Transformation complete: {}/{total} processed, {} failed",
        summary.succeeded, summary.failed
    );
    Ok(summary)
}

fn process_symbol(
    raw_store: &RawStore,
    processed_store: &ProcessedStore,
    symbol: &str,
) -> Result<usize, TransformError> {
    let raw = raw_store.load(symbol)?;
    let canonical = normalize(raw)?;
    let enriched = enrich(canonical)?;
    processed_store.write(symbol, &enriched)?;
    Ok(enriched.height())
}
