//! Missing-symbol log — append-only record of symbols that produced no
//! usable data. Never deduplicated; purely diagnostic.

use super::StoreError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only newline-delimited symbol log.
pub struct MissingLog {
    path: PathBuf,
}

impl MissingLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one symbol to the log.
    pub fn append(&self, symbol: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("failed to create log dir: {e}")))?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::Io(format!("open log: {e}")))?;
        writeln!(file, "{symbol}").map_err(|e| StoreError::Io(format!("append log: {e}")))?;
        Ok(())
    }

    /// All logged symbols, in append order. Empty if the log doesn't exist.
    pub fn read(&self) -> Result<Vec<String>, StoreError> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Io(format!("read log: {e}")))?;
        Ok(content.lines().map(str::to_string).collect())
    }
}
