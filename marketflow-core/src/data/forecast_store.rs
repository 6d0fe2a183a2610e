//! Forecast store — one CSV record per symbol with columns
//! `ds, yhat, yhat_lower, yhat_upper`. A new forecast fully replaces the
//! prior record for that symbol.

use super::StoreError;
use crate::forecast::ForecastPoint;
use std::fs;
use std::path::{Path, PathBuf};

const FORECAST_SUFFIX: &str = "_forecast.csv";

/// The forecast store.
pub struct ForecastStore {
    root: PathBuf,
}

impl ForecastStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}{FORECAST_SUFFIX}"))
    }

    pub fn exists(&self, symbol: &str) -> bool {
        self.path(symbol).is_file()
    }

    /// Write a symbol's forecast, replacing any prior record.
    pub fn write(&self, symbol: &str, points: &[ForecastPoint]) -> Result<(), StoreError> {
        if points.is_empty() {
            return Err(StoreError::Validation("empty forecast".into()));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError::Io(format!("failed to create dir: {e}")))?;

        let path = self.path(symbol);
        let tmp_path = path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&tmp_path)
            .map_err(|e| StoreError::Csv(format!("create writer: {e}")))?;
        for point in points {
            writer
                .serialize(point)
                .map_err(|e| StoreError::Csv(format!("serialize row: {e}")))?;
        }
        writer
            .flush()
            .map_err(|e| StoreError::Csv(format!("flush: {e}")))?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io(format!("atomic rename failed: {e}"))
        })?;

        Ok(())
    }

    /// Load a symbol's forecast record.
    pub fn load(&self, symbol: &str) -> Result<Vec<ForecastPoint>, StoreError> {
        let path = self.path(symbol);
        if !path.is_file() {
            return Err(StoreError::NoRecord {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path)
            .map_err(|e| StoreError::Csv(format!("open reader: {e}")))?;
        let mut points = Vec::new();
        for record in reader.deserialize() {
            let point: ForecastPoint =
                record.map_err(|e| StoreError::Csv(format!("parse row: {e}")))?;
            points.push(point);
        }
        Ok(points)
    }

    /// Symbols with a forecast record on disk, sorted.
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
            if let Some(symbol) = name.strip_suffix(FORECAST_SUFFIX) {
                symbols.push(symbol.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
