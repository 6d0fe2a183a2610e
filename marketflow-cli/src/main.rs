//! MarketFlow CLI — batch pipeline over an equity universe.
//!
//! Commands:
//! - `run` — full pipeline: extract → transform → forecast
//! - `extract` — download raw history for the universe
//! - `transform` — normalize + enrich all raw records on disk
//! - `forecast` — forecast all processed records on disk
//! - `status` — report store contents and raw coverage
//!
//! Exit codes: 0 = complete success, 1 = configuration-level fault,
//! 2 = partial failure (one or more symbols failed; see the missing log).

use anyhow::Result;
use clap::{Parser, Subcommand};
use marketflow_core::data::{
    ForecastStore, MissingLog, ProcessedStore, RawStore, StdoutProgress, Universe, YahooProvider,
};
use marketflow_pipeline::{
    run_extraction, run_forecasts, run_pipeline, run_transformation, PipelineConfig,
    PipelineSummary, StageSummary,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "marketflow",
    about = "MarketFlow — S&P 500 price pipeline: extraction, indicators, forecasts"
)]
struct Cli {
    /// Path to a pipeline TOML config. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Universe TOML (ordered symbol → display-name entries).
    /// Defaults to the built-in S&P 500 sample.
    #[arg(long, global = true)]
    universe: Option<PathBuf>,

    /// Override the configured data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract → transform → forecast.
    Run,
    /// Download raw daily history for the universe.
    Extract {
        /// Re-download even when a raw record already exists.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Normalize and enrich all raw records on disk.
    Transform,
    /// Produce forecasts for all processed records on disk.
    Forecast {
        /// Forecast horizon in calendar days (overrides the config).
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Report store contents and per-symbol raw coverage.
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path).map_err(anyhow::Error::msg)?,
        None => PipelineConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    let universe = match &cli.universe {
        Some(path) => Universe::from_file(path).map_err(anyhow::Error::msg)?,
        None => Universe::default_sp500(),
    };

    match cli.command {
        Commands::Run => cmd_run(&config, &universe),
        Commands::Extract { force } => cmd_extract(&config, &universe, force),
        Commands::Transform => cmd_transform(&config),
        Commands::Forecast { horizon } => cmd_forecast(&config, horizon),
        Commands::Status => cmd_status(&config),
    }
}

fn cmd_run(config: &PipelineConfig, universe: &Universe) -> Result<()> {
    let provider = YahooProvider::new(config.fetch_timeout());
    let summary = run_pipeline(config, universe, &provider, &StdoutProgress)?;

    print_pipeline_summary(&summary);
    std::process::exit(summary.exit_code());
}

fn cmd_extract(config: &PipelineConfig, universe: &Universe, force: bool) -> Result<()> {
    let provider = YahooProvider::new(config.fetch_timeout());
    let fetcher = marketflow_core::data::Fetcher::new(&provider, config.fetch_policy());
    let raw_store = RawStore::new(config.raw_dir());
    let missing_log = MissingLog::new(config.missing_log_path());

    let tickers = universe.tickers();
    let skip_existing = !force && config.skip_existing;

    let summary = run_extraction(
        &tickers,
        &fetcher,
        &raw_store,
        &missing_log,
        config.window_years,
        skip_existing,
        &config.pacing,
        &StdoutProgress,
    );

    if summary.failed > 0 {
        println!("See {} for details.", missing_log.path().display());
    }
    exit_for_stage(&summary);
}

fn cmd_transform(config: &PipelineConfig) -> Result<()> {
    let raw_store = RawStore::new(config.raw_dir());
    let processed_store = ProcessedStore::new(config.processed_dir());

    let summary = run_transformation(&raw_store, &processed_store)?;
    exit_for_stage(&summary);
}

fn cmd_forecast(config: &PipelineConfig, horizon: Option<usize>) -> Result<()> {
    let processed_store = ProcessedStore::new(config.processed_dir());
    let forecast_store = ForecastStore::new(config.forecast_dir());
    let horizon_days = horizon.unwrap_or(config.horizon_days);

    let summary = run_forecasts(&processed_store, &forecast_store, horizon_days)?;
    exit_for_stage(&summary);
}

fn cmd_status(config: &PipelineConfig) -> Result<()> {
    let raw_store = RawStore::new(config.raw_dir());
    let processed_store = ProcessedStore::new(config.processed_dir());
    let forecast_store = ForecastStore::new(config.forecast_dir());
    let missing_log = MissingLog::new(config.missing_log_path());

    let raw_symbols = raw_store.list()?;
    let processed = processed_store.list()?;
    let forecasts = forecast_store.list()?;
    let missing = missing_log.read()?;

    println!("Data directory: {}", config.data_dir.display());
    println!("Raw records:       {}", raw_symbols.len());
    println!("Processed records: {}", processed.len());
    println!("Forecast records:  {}", forecasts.len());
    println!("Missing-log lines: {}", missing.len());

    if raw_symbols.is_empty() {
        return Ok(());
    }

    println!();
    println!(
        "{:<8} {:<25} {:>8}  {}",
        "Symbol", "Date Range", "Rows", "Source"
    );
    println!("{}", "-".repeat(58));
    for symbol in &raw_symbols {
        match raw_store.meta(symbol) {
            Some(meta) => println!(
                "{:<8} {:<25} {:>8}  {}",
                symbol,
                format!("{} to {}", meta.start_date, meta.end_date),
                meta.row_count,
                meta.source
            ),
            None => println!("{:<8} {:<25} {:>8}", symbol, "(no meta)", ""),
        }
    }

    Ok(())
}

fn print_pipeline_summary(summary: &PipelineSummary) {
    println!();
    println!("=== Pipeline Summary ===");
    print_stage("Extraction", &summary.extraction);
    print_stage("Transformation", &summary.transformation);
    print_stage("Forecasting", &summary.forecasting);
    if summary.is_complete_success() {
        println!("All stages completed without failures.");
    } else {
        println!("Completed with per-symbol failures (exit code 2).");
    }
}

fn print_stage(name: &str, stage: &StageSummary) {
    println!(
        "{name:<15} {} succeeded, {} failed, {} skipped (of {})",
        stage.succeeded, stage.failed, stage.skipped, stage.total
    );
}

fn exit_for_stage(summary: &StageSummary) -> ! {
    if summary.all_succeeded() {
        std::process::exit(0);
    }
    std::process::exit(2);
}
