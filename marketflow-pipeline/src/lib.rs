//! MarketFlow pipeline driver — sequences extraction, transformation, and
//! forecasting over the symbol universe and aggregates stage summaries.
//!
//! Data flows strictly forward: fetcher → raw store → normalizer →
//! indicator enrichment → processed store → forecaster → forecast store.
//! No stage reads a downstream store, and no per-symbol failure is ever
//! fatal to a run.

pub mod config;
pub mod extract;
pub mod forecast;
pub mod summary;
pub mod transform;

pub use config::{FetchConfig, PacingConfig, PipelineConfig};
pub use extract::run_extraction;
pub use forecast::run_forecasts;
pub use summary::{PipelineSummary, StageSummary};
pub use transform::run_transformation;

use marketflow_core::data::{
    BarProvider, FetchProgress, Fetcher, ForecastStore, MissingLog, ProcessedStore, RawStore,
    StoreError, Universe,
};

/// Run the full pipeline: extract → transform → forecast.
///
/// Extraction honors the skip-existing policy; transformation and
/// forecasting cover whatever is on disk afterwards, so interrupted runs
/// resume cleanly. Returns the stage summaries; the only errors raised are
/// configuration-level (unreadable store directories).
pub fn run_pipeline(
    config: &PipelineConfig,
    universe: &Universe,
    provider: &dyn BarProvider,
    progress: &dyn FetchProgress,
) -> Result<PipelineSummary, StoreError> {
    let fetcher = Fetcher::new(provider, config.fetch_policy());
    let raw_store = RawStore::new(config.raw_dir());
    let processed_store = ProcessedStore::new(config.processed_dir());
    let forecast_store = ForecastStore::new(config.forecast_dir());
    let missing_log = MissingLog::new(config.missing_log_path());

    let tickers = universe.tickers();

    println!("Extracting raw history for {} symbols...", tickers.len());
    let extraction = run_extraction(
        &tickers,
        &fetcher,
        &raw_store,
        &missing_log,
        config.window_years,
        config.skip_existing,
        &config.pacing,
        progress,
    );
    if extraction.failed > 0 {
        println!("See {} for details.", missing_log.path().display());
    }

    println!("\nTransforming raw records...");
    let transformation = run_transformation(&raw_store, &processed_store)?;

    println!("\nForecasting processed records...");
    let forecasting = run_forecasts(&processed_store, &forecast_store, config.horizon_days)?;

    Ok(PipelineSummary {
        extraction,
        transformation,
        forecasting,
    })
}
