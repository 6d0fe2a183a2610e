//! Additive trend + day-of-week seasonality, fitted by least squares.
//!
//! close[t] = intercept + slope·t + seasonal[weekday(t)] + ε
//!
//! The trend is an OLS line over the day index; seasonal offsets are mean
//! detrended residuals per weekday, centered to zero; the uncertainty band
//! is ±z·σ where σ is the residual standard deviation under the full model.

use super::{ForecastError, ForecastPoint, INTERVAL_Z};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone)]
pub struct SeasonalTrendModel {
    origin: NaiveDate,
    intercept: f64,
    slope: f64,
    seasonal: [f64; 7],
    sigma: f64,
}

impl SeasonalTrendModel {
    /// Fit the model on (date, value) observations.
    ///
    /// `dates` must be ascending and parallel to `values`. Fails on
    /// non-finite inputs or a degenerate fit; callers catch the failure
    /// per symbol.
    pub fn fit(dates: &[NaiveDate], values: &[f64]) -> Result<Self, ForecastError> {
        let n = dates.len();
        if n != values.len() {
            return Err(ForecastError::FitFailed(format!(
                "{n} dates vs {} values",
                values.len()
            )));
        }
        if n < 2 {
            return Err(ForecastError::FitFailed(format!(
                "{n} observations, need at least 2"
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::FitFailed("non-finite close values".into()));
        }

        let origin = dates[0];
        let ts: Vec<f64> = dates
            .iter()
            .map(|d| (*d - origin).num_days() as f64)
            .collect();

        // OLS trend
        let t_mean = ts.iter().sum::<f64>() / n as f64;
        let y_mean = values.iter().sum::<f64>() / n as f64;
        let mut cov = 0.0;
        let mut var = 0.0;
        for (t, y) in ts.iter().zip(values) {
            cov += (t - t_mean) * (y - y_mean);
            var += (t - t_mean) * (t - t_mean);
        }
        let slope = if var > 0.0 { cov / var } else { 0.0 };
        let intercept = y_mean - slope * t_mean;

        // Seasonal offsets: mean detrended residual per weekday, centered
        // over the weekdays that actually occur.
        let mut sums = [0.0; 7];
        let mut counts = [0usize; 7];
        for ((d, t), y) in dates.iter().zip(&ts).zip(values) {
            let w = d.weekday().num_days_from_monday() as usize;
            sums[w] += y - (intercept + slope * t);
            counts[w] += 1;
        }
        let mut seasonal = [0.0; 7];
        for w in 0..7 {
            if counts[w] > 0 {
                seasonal[w] = sums[w] / counts[w] as f64;
            }
        }
        let occupied = counts.iter().filter(|&&c| c > 0).count();
        let mean_offset = seasonal
            .iter()
            .zip(&counts)
            .filter(|(_, &c)| c > 0)
            .map(|(s, _)| s)
            .sum::<f64>()
            / occupied as f64;
        for w in 0..7 {
            if counts[w] > 0 {
                seasonal[w] -= mean_offset;
            }
        }

        // Residual spread under the full model
        let mut ss = 0.0;
        for ((d, t), y) in dates.iter().zip(&ts).zip(values) {
            let w = d.weekday().num_days_from_monday() as usize;
            let r = y - (intercept + slope * t + seasonal[w]);
            ss += r * r;
        }
        let sigma = (ss / n as f64).sqrt();

        if !intercept.is_finite() || !slope.is_finite() || !sigma.is_finite() {
            return Err(ForecastError::FitFailed("degenerate fit".into()));
        }

        Ok(Self {
            origin,
            intercept,
            slope,
            seasonal,
            sigma,
        })
    }

    /// Predict the value and uncertainty band for one date.
    pub fn predict(&self, date: NaiveDate) -> ForecastPoint {
        let t = (date - self.origin).num_days() as f64;
        let w = date.weekday().num_days_from_monday() as usize;
        let yhat = self.intercept + self.slope * t + self.seasonal[w];
        let band = INTERVAL_Z * self.sigma;
        ForecastPoint {
            ds: date,
            yhat,
            yhat_lower: yhat - band,
            yhat_upper: yhat + band,
        }
    }
}
