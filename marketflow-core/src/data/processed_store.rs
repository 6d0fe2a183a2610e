//! Processed store — one parquet record per symbol, canonical OHLCV plus
//! indicator columns. Writes are atomic (tmp + rename); loads validate the
//! canonical schema before handing the frame to downstream stages.

use super::StoreError;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// The five canonical columns every processed record must carry.
pub const CANONICAL_COLUMNS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];

/// The processed store.
pub struct ProcessedStore {
    root: PathBuf,
}

impl ProcessedStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, symbol: &str) -> PathBuf {
        self.root.join(format!("{symbol}.parquet"))
    }

    pub fn exists(&self, symbol: &str) -> bool {
        self.path(symbol).is_file()
    }

    /// Write a symbol's processed frame, replacing any prior record.
    pub fn write(&self, symbol: &str, df: &DataFrame) -> Result<(), StoreError> {
        if df.height() == 0 {
            return Err(StoreError::Validation("empty processed frame".into()));
        }

        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError::Io(format!("failed to create dir: {e}")))?;

        let path = self.path(symbol);
        let tmp_path = path.with_extension("parquet.tmp");

        let file = fs::File::create(&tmp_path)
            .map_err(|e| StoreError::Io(format!("create file: {e}")))?;
        ParquetWriter::new(file)
            .finish(&mut df.clone())
            .map_err(|e| StoreError::Parquet(format!("write parquet: {e}")))?;

        fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::Io(format!("atomic rename failed: {e}"))
        })?;

        Ok(())
    }

    /// Load and validate a symbol's processed frame.
    pub fn load(&self, symbol: &str) -> Result<DataFrame, StoreError> {
        let path = self.path(symbol);
        if !path.is_file() {
            return Err(StoreError::NoRecord {
                symbol: symbol.to_string(),
            });
        }

        let file = fs::File::open(&path).map_err(|e| StoreError::Io(format!("open: {e}")))?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| StoreError::Parquet(format!("read parquet: {e}")))?;

        if df.height() == 0 {
            return Err(StoreError::Validation("empty parquet file".into()));
        }
        if df.column("date").is_err() {
            return Err(StoreError::Validation("missing column 'date'".into()));
        }
        for col_name in &CANONICAL_COLUMNS {
            if df.column(col_name).is_err() {
                return Err(StoreError::Validation(format!(
                    "missing column '{col_name}'"
                )));
            }
        }

        Ok(df)
    }

    /// Symbols with a processed record on disk, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.root).map_err(|e| StoreError::Io(format!("read dir: {e}")))?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(format!("dir entry: {e}")))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("parquet") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
