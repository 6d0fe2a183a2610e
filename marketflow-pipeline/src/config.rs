//! Pipeline configuration — directories, fetch window, forecast horizon,
//! retry policy, and rate-limit pacing. Loaded from TOML.
//!
//! Every sleep is an explicit field rather than a hard-coded constant, so
//! tests run the same code paths with zero durations.

use marketflow_core::data::FetchPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root for the raw/processed/forecast store directories.
    pub data_dir: PathBuf,
    /// Directory for the missing-symbol log.
    pub log_dir: PathBuf,
    /// Trailing history window fetched per symbol, in years.
    pub window_years: u32,
    /// Forecast horizon in calendar days.
    pub horizon_days: usize,
    /// Skip symbols whose raw record already exists (resumable runs).
    pub skip_existing: bool,
    pub fetch: FetchConfig,
    pub pacing: PacingConfig,
}

/// Retry policy for a single symbol's fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total attempts per symbol.
    pub max_retries: u32,
    /// Backoff base in milliseconds; attempt k sleeps `retry_sleep_ms * k`.
    pub retry_sleep_ms: u64,
    /// HTTP client timeout in seconds.
    pub timeout_secs: u64,
}

/// Batch pacing to stay under provider rate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay after every fetch request, in milliseconds.
    pub request_sleep_ms: u64,
    /// Take a longer pause after every N universe positions (0 disables).
    pub batch_pause_every: usize,
    /// Length of the longer pause, in seconds.
    pub batch_pause_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_dir: PathBuf::from("logs"),
            window_years: 2,
            horizon_days: 7,
            skip_existing: true,
            fetch: FetchConfig::default(),
            pacing: PacingConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_sleep_ms: 2_000,
            timeout_secs: 30,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            request_sleep_ms: 250,
            batch_pause_every: 50,
            batch_pause_secs: 5,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read config file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse config TOML: {e}"))
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.data_dir.join("raw")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.data_dir.join("processed")
    }

    pub fn forecast_dir(&self) -> PathBuf {
        self.data_dir.join("forecasts")
    }

    pub fn missing_log_path(&self) -> PathBuf {
        self.log_dir.join("missing_symbols.txt")
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_retries: self.fetch.max_retries,
            retry_sleep: Duration::from_millis(self.fetch.retry_sleep_ms),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}

impl PacingConfig {
    pub fn request_sleep(&self) -> Duration {
        Duration::from_millis(self.request_sleep_ms)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_secs(self.batch_pause_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_policy() {
        let config = PipelineConfig::default();
        assert_eq!(config.window_years, 2);
        assert_eq!(config.horizon_days, 7);
        assert!(config.skip_existing);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.fetch.retry_sleep_ms, 2_000);
        assert_eq!(config.pacing.request_sleep_ms, 250);
        assert_eq!(config.pacing.batch_pause_every, 50);
        assert_eq!(config.pacing.batch_pause_secs, 5);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            data_dir = "/tmp/marketflow"
            window_years = 5

            [fetch]
            max_retries = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/marketflow"));
        assert_eq!(config.window_years, 5);
        assert_eq!(config.fetch.max_retries, 2);
        // untouched sections keep their defaults
        assert_eq!(config.fetch.retry_sleep_ms, 2_000);
        assert_eq!(config.pacing.batch_pause_every, 50);
    }

    #[test]
    fn store_paths_derive_from_data_dir() {
        let config = PipelineConfig {
            data_dir: PathBuf::from("/d"),
            log_dir: PathBuf::from("/l"),
            ..Default::default()
        };
        assert_eq!(config.raw_dir(), PathBuf::from("/d/raw"));
        assert_eq!(config.processed_dir(), PathBuf::from("/d/processed"));
        assert_eq!(config.forecast_dir(), PathBuf::from("/d/forecasts"));
        assert_eq!(
            config.missing_log_path(),
            PathBuf::from("/l/missing_symbols.txt")
        );
    }

    #[test]
    fn fetch_policy_converts_durations() {
        let config = PipelineConfig::default();
        let policy = config.fetch_policy();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.retry_sleep, Duration::from_secs(2));
    }
}
