//! Indicator enrichment — appends the fixed indicator set to a canonical
//! frame. Pure append: existing rows are never removed or reordered, and
//! undefined warm-up values are stored as nulls, never zeros.

use super::{atr, ema, rsi, vwap};
use crate::normalize::SchemaError;
use polars::prelude::*;

pub const EMA_SHORT_WINDOW: usize = 20;
pub const EMA_LONG_WINDOW: usize = 50;
pub const RSI_WINDOW: usize = 14;
pub const ATR_WINDOW: usize = 14;

/// Append `EMA_20, EMA_50, RSI_14, Volatility_ATR, VWAP` to a canonical
/// frame. The only failure mode is a missing required column, which the
/// normalizer rules out upstream.
pub fn enrich(df: DataFrame) -> Result<DataFrame, SchemaError> {
    let closes = column_f64(&df, "Close")?;
    let highs = column_f64(&df, "High")?;
    let lows = column_f64(&df, "Low")?;
    let volumes = column_f64(&df, "Volume")?;

    let mut df = df;
    append(&mut df, "EMA_20", ema::ema(&closes, EMA_SHORT_WINDOW))?;
    append(&mut df, "EMA_50", ema::ema(&closes, EMA_LONG_WINDOW))?;
    append(&mut df, "RSI_14", rsi::rsi(&closes, RSI_WINDOW))?;
    append(
        &mut df,
        "Volatility_ATR",
        atr::atr(&highs, &lows, &closes, ATR_WINDOW),
    )?;
    append(
        &mut df,
        "VWAP",
        vwap::vwap(&highs, &lows, &closes, &volumes),
    )?;
    Ok(df)
}

fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>, SchemaError> {
    let column = df
        .column(name)
        .map_err(|_| SchemaError::MissingColumn(name.to_string()))?;
    let casted = column.cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn append(df: &mut DataFrame, name: &str, values: Vec<f64>) -> Result<(), SchemaError> {
    let nullable: Vec<Option<f64>> = values
        .into_iter()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .collect();
    df.with_column(Series::new(name.into(), nullable))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn canonical_frame(n: usize) -> DataFrame {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let dates: Vec<i32> = (0..n)
            .map(|i| ((base + chrono::Duration::days(i as i64)) - epoch).num_days() as i32)
            .collect();
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0).collect();
        let opens: Vec<f64> = closes.iter().map(|c| c - 0.5).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.5).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.5).collect();
        let volumes: Vec<i64> = (0..n).map(|i| 1_000 + i as i64).collect();

        DataFrame::new(vec![
            Column::new("date".into(), dates)
                .cast(&DataType::Date)
                .unwrap(),
            Column::new("Open".into(), opens),
            Column::new("High".into(), highs),
            Column::new("Low".into(), lows),
            Column::new("Close".into(), closes),
            Column::new("Volume".into(), volumes),
        ])
        .unwrap()
    }

    #[test]
    fn appends_the_five_indicator_columns() {
        let out = enrich(canonical_frame(60)).unwrap();
        for name in ["EMA_20", "EMA_50", "RSI_14", "Volatility_ATR", "VWAP"] {
            assert!(out.column(name).is_ok(), "missing {name}");
        }
        assert_eq!(out.height(), 60);
    }

    #[test]
    fn warmup_rows_are_null_not_zero() {
        let out = enrich(canonical_frame(60)).unwrap();

        assert_eq!(out.column("EMA_20").unwrap().null_count(), 19);
        assert_eq!(out.column("EMA_50").unwrap().null_count(), 49);
        assert_eq!(out.column("RSI_14").unwrap().null_count(), 14);
        assert_eq!(out.column("Volatility_ATR").unwrap().null_count(), 14);
        assert_eq!(out.column("VWAP").unwrap().null_count(), 0);

        // The first defined EMA_20 must not be zero
        let ema20 = out.column("EMA_20").unwrap().f64().unwrap();
        assert!(ema20.get(19).unwrap() > 0.0);
    }

    #[test]
    fn short_series_leaves_long_indicators_entirely_null() {
        let out = enrich(canonical_frame(30)).unwrap();
        assert_eq!(out.column("EMA_50").unwrap().null_count(), 30);
        assert_eq!(out.column("EMA_20").unwrap().null_count(), 19);
    }

    #[test]
    fn existing_rows_are_untouched() {
        let input = canonical_frame(40);
        let closes_before: Vec<Option<f64>> = input
            .column("Close")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        let out = enrich(input).unwrap();
        let closes_after: Vec<Option<f64>> = out
            .column("Close")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(closes_before, closes_after);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let df = canonical_frame(40).drop("High").unwrap();
        assert!(matches!(
            enrich(df),
            Err(SchemaError::MissingColumn(name)) if name == "High"
        ));
    }
}
