//! Volume-Weighted Average Price (VWAP).
//!
//! Cumulative over the whole series, not a rolling window:
//! VWAP[t] = Σ(typical[0..=t] · volume[0..=t]) / Σ(volume[0..=t])
//! with typical = (high + low + close) / 3. Defined from the first row,
//! except while cumulative volume is still zero.

/// Compute the cumulative VWAP. NaN marks undefined values.
pub fn vwap(highs: &[f64], lows: &[f64], closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];

    let mut cum_pv = 0.0;
    let mut cum_vol = 0.0;

    for i in 0..n {
        if highs[i].is_nan() || lows[i].is_nan() || closes[i].is_nan() || volumes[i].is_nan() {
            // NaN would poison the accumulators for every later row
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let typical = (highs[i] + lows[i] + closes[i]) / 3.0;
        cum_pv += typical * volumes[i];
        cum_vol += volumes[i];
        result[i] = if cum_vol > 0.0 {
            cum_pv / cum_vol
        } else {
            f64::NAN
        };
    }

    result
}
