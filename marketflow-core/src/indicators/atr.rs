//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period (TR[0] has no previous close and is excluded from the
//! seed, so the first defined value lands at index `period`).

/// Compute the True Range series.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = closes.len();
    let mut tr = vec![f64::NAN; n];

    if n == 0 {
        return tr;
    }

    if highs[0].is_nan() || lows[0].is_nan() {
        tr[0] = f64::NAN;
    } else {
        tr[0] = highs[0] - lows[0];
    }

    for i in 1..n {
        let h = highs[i];
        let l = lows[i];
        let pc = closes[i - 1];
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            tr[i] = f64::NAN;
        } else {
            tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
        }
    }

    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
/// Seed: mean of the first window of `period` consecutive non-NaN values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    // Find the first index with `period` consecutive non-NaN values
    let seed_start = {
        let mut start = None;
        for i in 0..n {
            if values[i].is_nan() {
                continue;
            }
            let mut count = 0;
            let mut valid = true;
            for v in &values[i..n] {
                if v.is_nan() {
                    valid = false;
                    break;
                }
                count += 1;
                if count == period {
                    break;
                }
            }
            if valid && count == period {
                start = Some(i);
                break;
            }
        }
        start
    };

    let seed_start = match seed_start {
        Some(s) => s,
        None => return result,
    };

    let seed_end = seed_start + period;
    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;

    for i in seed_end..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// Compute the ATR. NaN marks undefined values.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let mut tr = true_range(highs, lows, closes);
    // TR[0] has no previous close — it's just high-low, not proper true
    // range. Mark it NaN so the Wilder seed starts from TR[1], consistent
    // with lookback = period.
    if !tr.is_empty() {
        tr[0] = f64::NAN;
    }
    wilder_smooth(&tr, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    // (high, low, close) triples unzipped into parallel slices
    fn unzip(rows: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let highs = rows.iter().map(|r| r.0).collect();
        let lows = rows.iter().map(|r| r.1).collect();
        let closes = rows.iter().map(|r| r.2).collect();
        (highs, lows, closes)
    }

    #[test]
    fn true_range_basic() {
        let (highs, lows, closes) = unzip(&[
            (105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&highs, &lows, &closes);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 115-108
        let (highs, lows, closes) = unzip(&[(102.0, 97.0, 100.0), (115.0, 108.0, 112.0)]);
        let tr = true_range(&highs, &lows, &closes);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let (highs, lows, closes) = unzip(&[
            (105.0, 95.0, 102.0),  // TR = 10 (excluded from seed)
            (108.0, 100.0, 106.0), // TR = 8
            (107.0, 98.0, 99.0),   // TR = 9
            (103.0, 97.0, 101.0),  // TR = 6
            (106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = atr(&highs, &lows, &closes, 3);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        // Seed uses TR[1..=3] = [8, 9, 6]: ATR[3] = 23/3
        // ATR[4] = (1/3)*6 + (2/3)*(23/3) = 64/9
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_warmup_is_exactly_period() {
        let n = 40;
        let highs: Vec<f64> = (0..n).map(|i| 102.0 + (i as f64 * 0.3).sin()).collect();
        let lows: Vec<f64> = (0..n).map(|i| 98.0 + (i as f64 * 0.3).sin()).collect();
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin()).collect();
        let result = atr(&highs, &lows, &closes, 14);
        let undefined = result.iter().filter(|v| v.is_nan()).count();
        assert_eq!(undefined, 14);
    }

    #[test]
    fn wilder_smooth_short_series_is_all_nan() {
        let result = wilder_smooth(&[1.0, 2.0], 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
