//! Universe configuration — the ordered symbol list with display names.
//!
//! Stored as a TOML file with one `[[symbols]]` entry per constituent.
//! Order is preserved (it drives fetch order and rate-limit pacing);
//! duplicate symbols are a configuration error. The display names exist for
//! presentation layers only — the pipeline itself keys everything by symbol.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One universe constituent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub symbol: String,
    pub name: String,
}

/// The complete universe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub symbols: Vec<SymbolEntry>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read universe file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let universe: Universe =
            toml::from_str(content).map_err(|e| format!("parse universe TOML: {e}"))?;
        let mut seen = HashSet::new();
        for entry in &universe.symbols {
            if !seen.insert(entry.symbol.as_str()) {
                return Err(format!("duplicate symbol '{}' in universe", entry.symbol));
            }
        }
        Ok(universe)
    }

    /// The ordered ticker list.
    pub fn tickers(&self) -> Vec<&str> {
        self.symbols.iter().map(|e| e.symbol.as_str()).collect()
    }

    /// Display name for a symbol.
    pub fn display_name(&self, symbol: &str) -> Option<&str> {
        self.symbols
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize universe: {e}"))
    }

    /// Built-in default universe: a large-cap S&P 500 sample.
    pub fn default_sp500() -> Self {
        let entries: &[(&str, &str)] = &[
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
            ("AMZN", "Amazon.com, Inc."),
            ("NVDA", "NVIDIA Corporation"),
            ("GOOGL", "Alphabet Inc. (Class A)"),
            ("META", "Meta Platforms, Inc."),
            ("BRK.B", "Berkshire Hathaway Inc. (Class B)"),
            ("LLY", "Eli Lilly and Company"),
            ("AVGO", "Broadcom Inc."),
            ("JPM", "JPMorgan Chase & Co."),
            ("TSLA", "Tesla, Inc."),
            ("XOM", "Exxon Mobil Corporation"),
            ("UNH", "UnitedHealth Group Incorporated"),
            ("V", "Visa Inc."),
            ("PG", "The Procter & Gamble Company"),
            ("MA", "Mastercard Incorporated"),
            ("JNJ", "Johnson & Johnson"),
            ("HD", "The Home Depot, Inc."),
            ("COST", "Costco Wholesale Corporation"),
            ("MRK", "Merck & Co., Inc."),
            ("ABBV", "AbbVie Inc."),
            ("CVX", "Chevron Corporation"),
            ("KO", "The Coca-Cola Company"),
            ("PEP", "PepsiCo, Inc."),
            ("WMT", "Walmart Inc."),
            ("BAC", "Bank of America Corporation"),
            ("BF.B", "Brown-Forman Corporation (Class B)"),
            ("MCD", "McDonald's Corporation"),
            ("CSCO", "Cisco Systems, Inc."),
            ("ORCL", "Oracle Corporation"),
        ];
        Self {
            symbols: entries
                .iter()
                .map(|&(symbol, name)| SymbolEntry {
                    symbol: symbol.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}
