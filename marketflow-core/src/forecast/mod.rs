//! Close-price forecasting.
//!
//! Fits an additive trend + weekly-seasonality model per symbol on the
//! closing-price series and emits a fixed-horizon point forecast with a
//! two-sided uncertainty band. Symbols with too little history are skipped,
//! not failed — the model is statistically unreliable below
//! [`MIN_OBSERVATIONS`] points.

pub mod seasonal;

pub use seasonal::SeasonalTrendModel;

use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum usable (date, close) observations required to fit.
pub const MIN_OBSERVATIONS: usize = 30;

/// Default forecast horizon in calendar days.
pub const DEFAULT_HORIZON_DAYS: usize = 7;

/// z-score of the two-sided 80% uncertainty interval.
pub(crate) const INTERVAL_Z: f64 = 1.2816;

/// One forecasted day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
}

/// Result of forecasting one symbol.
#[derive(Debug)]
pub enum ForecastOutcome {
    Forecast(Vec<ForecastPoint>),
    /// Too little history — informational, distinct from a failure.
    Skipped { observations: usize },
}

/// Per-symbol forecast failures. Caught by the driver, never batch-fatal.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("no Close column in processed frame")]
    MissingClose,

    #[error("no resolvable date column in processed frame")]
    MissingDate,

    #[error("model fit failed: {0}")]
    FitFailed(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Forecast a processed frame's closing prices `horizon_days` calendar days
/// past the last historical date. Only the future extension is returned —
/// in-sample fitted values are discarded.
pub fn forecast_closes(
    df: &DataFrame,
    horizon_days: usize,
) -> Result<ForecastOutcome, ForecastError> {
    let (dates, closes) = close_series(df)?;

    if dates.len() < MIN_OBSERVATIONS {
        return Ok(ForecastOutcome::Skipped {
            observations: dates.len(),
        });
    }

    let model = SeasonalTrendModel::fit(&dates, &closes)?;
    let last = dates[dates.len() - 1];

    let points = (1..=horizon_days as i64)
        .map(|k| model.predict(last + chrono::Duration::days(k)))
        .collect();

    Ok(ForecastOutcome::Forecast(points))
}

/// Project the frame to non-null (date, close) pairs.
fn close_series(df: &DataFrame) -> Result<(Vec<NaiveDate>, Vec<f64>), ForecastError> {
    let date_col = df.column("date").map_err(|_| ForecastError::MissingDate)?;
    let date_ca = date_col.date().map_err(|_| ForecastError::MissingDate)?;

    let close_col = df.column("Close").map_err(|_| ForecastError::MissingClose)?;
    let close_cast = close_col.cast(&DataType::Float64)?;
    let close_ca = close_cast.f64()?;

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    let mut dates = Vec::with_capacity(df.height());
    let mut closes = Vec::with_capacity(df.height());

    for i in 0..df.height() {
        if let (Some(days), Some(close)) = (date_ca.get(i), close_ca.get(i)) {
            dates.push(epoch + chrono::Duration::days(days as i64));
            closes.push(close);
        }
    }

    Ok((dates, closes))
}
