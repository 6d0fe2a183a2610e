//! Raw store — one immutable CSV record per symbol plus a metadata sidecar.
//!
//! Layout: `{root}/{SYMBOL}_raw.csv` + `{root}/{SYMBOL}_meta.json`
//!
//! Columns use the provider's lower-case naming (`date, open, high, low,
//! close, adjclose, volume`); the schema normalizer canonicalizes them on
//! the way to the processed store. Writes are atomic (tmp + rename).
//! `WriteMode::IfAbsent` is the contract behind skip-existing resumption:
//! an existing record is never touched, so reruns are no-ops for symbols
//! already fetched.

use super::StoreError;
use crate::domain::RawBar;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const RAW_SUFFIX: &str = "_raw.csv";

/// Write disposition for a raw record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep an existing record untouched.
    IfAbsent,
    /// Replace any existing record wholesale (records supersede, never merge).
    Overwrite,
}

/// Metadata sidecar for a stored raw record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMeta {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub row_count: usize,
    pub data_hash: String,
    pub source: String,
    pub fetched_at: chrono::NaiveDateTime,
}

/// The raw store.
pub struct RawStore {
    root: PathBuf,
}

impl RawStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}{RAW_SUFFIX}"))
    }

    fn meta_path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}_meta.json"))
    }

    /// Existence check backing the skip-existing policy.
    pub fn exists(&self, symbol: &str) -> bool {
        self.csv_path(symbol).is_file()
    }

    /// Write a symbol's bars. Returns `false` when `WriteMode::IfAbsent`
    /// found an existing record and left it untouched.
    pub fn write(
        &self,
        symbol: &str,
        bars: &[RawBar],
        mode: WriteMode,
        source: &str,
    ) -> Result<bool, StoreError> {
        if mode == WriteMode::IfAbsent && self.exists(symbol) {
            return Ok(false);
        }
        if bars.is_empty() {
            return Err(StoreError::Validation("no bars to store".into()));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError::Io(format!("failed to create dir: {e}")))?;

        let mut df = bars_to_dataframe(bars)?;
        let path = self.csv_path(symbol);
        let tmp_path = path.with_extension("csv.tmp");

        let file = fs::File::create(&tmp_path)
            .map_err(|e| StoreError::Io(format!("create file: {e}")))?;
        CsvWriter::new(file)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| StoreError::Csv(format!("write csv: {e}")))?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io(format!("atomic rename failed: {e}"))
        })?;

        let meta = RawMeta {
            symbol: symbol.to_string(),
            start_date: bars[0].date,
            end_date: bars[bars.len() - 1].date,
            row_count: bars.len(),
            data_hash: blake3::hash(
                &serde_json::to_vec(bars)
                    .map_err(|e| StoreError::Io(format!("hash serialization: {e}")))?,
            )
            .to_hex()
            .to_string(),
            source: source.to_string(),
            fetched_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| StoreError::Io(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(symbol), meta_json)
            .map_err(|e| StoreError::Io(format!("meta write: {e}")))?;

        Ok(true)
    }

    /// Load a symbol's raw record as a DataFrame.
    ///
    /// Dates come back as strings; the schema normalizer promotes them.
    pub fn load(&self, symbol: &str) -> Result<DataFrame, StoreError> {
        let path = self.csv_path(symbol);
        if !path.is_file() {
            return Err(StoreError::NoRecord {
                symbol: symbol.to_string(),
            });
        }
        LazyCsvReader::new(path)
            .with_has_header(true)
            .finish()
            .map_err(|e| StoreError::Csv(format!("read csv: {e}")))?
            .collect()
            .map_err(|e| StoreError::Csv(format!("collect csv: {e}")))
    }

    /// Symbols with a raw record on disk, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.root).map_err(|e| StoreError::Io(format!("read dir: {e}")))?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(format!("dir entry: {e}")))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(symbol) = name.strip_suffix(RAW_SUFFIX) {
                symbols.push(symbol.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    /// Metadata sidecar for a symbol, if present and parseable.
    pub fn meta(&self, symbol: &str) -> Option<RawMeta> {
        let content = fs::read_to_string(self.meta_path(symbol)).ok()?;
        serde_json::from_str(&content).ok()
    }
}

/// Convert raw bars to a provider-shaped DataFrame with nullable columns.
fn bars_to_dataframe(bars: &[RawBar]) -> Result<DataFrame, StoreError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let dates: Vec<i32> = bars
        .iter()
        .map(|b| (b.date - epoch).num_days() as i32)
        .collect();
    let opens: Vec<Option<f64>> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<Option<f64>> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<Option<f64>> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<Option<f64>> = bars.iter().map(|b| b.close).collect();
    let adj_closes: Vec<Option<f64>> = bars.iter().map(|b| b.adj_close).collect();
    let volumes: Vec<Option<u64>> = bars.iter().map(|b| b.volume).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| StoreError::Csv(format!("date cast: {e}")))?,
        Column::new("open".into(), opens),
        Column::new("high".into(), highs),
        Column::new("low".into(), lows),
        Column::new("close".into(), closes),
        Column::new("adjclose".into(), adj_closes),
        Column::new("volume".into(), volumes),
    ])
    .map_err(|e| StoreError::Csv(format!("dataframe creation: {e}")))
}
