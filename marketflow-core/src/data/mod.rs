//! Data layer: providers, resilient fetching, the three stores, the
//! missing-symbol log, and the universe configuration.

use thiserror::Error;

pub mod fetcher;
pub mod forecast_store;
pub mod missing_log;
pub mod processed_store;
pub mod provider;
pub mod raw_store;
pub mod universe;
pub mod yahoo;

pub use fetcher::{FetchOutcome, FetchPolicy, Fetcher};
pub use forecast_store::ForecastStore;
pub use missing_log::MissingLog;
pub use processed_store::{ProcessedStore, CANONICAL_COLUMNS};
pub use provider::{
    BarProvider, FetchError, FetchProgress, FetchReport, ProviderFrame, StdoutProgress,
};
pub use raw_store::{RawMeta, RawStore, WriteMode};
pub use universe::{SymbolEntry, Universe};
pub use yahoo::YahooProvider;

/// Structured error types for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(String),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error("no record for symbol '{symbol}'")]
    NoRecord { symbol: String },

    #[error("validation error: {0}")]
    Validation(String),
}
