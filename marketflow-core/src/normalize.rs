//! Schema normalization — heterogeneous raw columns to the canonical frame.
//!
//! Providers disagree on column naming and casing (`open` vs `Open`,
//! `adjclose` vs `Adj Close`) and on whether dates arrive typed or as
//! strings. Normalization produces one canonical shape: a `date` column of
//! dtype Date, unique and ascending, the five OHLCV columns renamed to
//! `{Open, High, Low, Close, Volume}` (plus `Adj Close` when present), and
//! no row with a null in any of the five. Unrecognized columns pass
//! through unchanged.

use polars::prelude::*;
use thiserror::Error;

/// Per-symbol schema failures. These abort the symbol, never the batch.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no Close column after normalization")]
    MissingClose,

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("no usable rows after normalization")]
    Empty,

    #[error("no recognizable date column")]
    NoDateColumn,

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Canonical rename target for a provider column name, matched
/// case-insensitively. `None` means the column passes through unchanged.
fn canonical_name(raw: &str) -> Option<&'static str> {
    match raw.to_ascii_lowercase().as_str() {
        "open" => Some("Open"),
        "high" => Some("High"),
        "low" => Some("Low"),
        "close" => Some("Close"),
        "adjclose" | "adj close" | "adj_close" => Some("Adj Close"),
        "volume" => Some("Volume"),
        _ => None,
    }
}

/// Normalize a raw frame into the canonical schema.
pub fn normalize(df: DataFrame) -> Result<DataFrame, SchemaError> {
    if df.height() == 0 {
        return Err(SchemaError::Empty);
    }

    let mut df = df;

    // Case-insensitive rename to canonical OHLCV names. The date column is
    // resolved separately below.
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in &names {
        if name.eq_ignore_ascii_case("date") {
            continue;
        }
        if let Some(canon) = canonical_name(name) {
            if canon != name {
                df.rename(name, canon.into())?;
            }
        }
    }

    let df = promote_date_column(df)?;

    if df.column("Close").is_err() {
        return Err(SchemaError::MissingClose);
    }
    for required in ["Open", "High", "Low", "Volume"] {
        if df.column(required).is_err() {
            return Err(SchemaError::MissingColumn(required.to_string()));
        }
    }

    // Partial bars are unusable for indicator computation: drop any row
    // with a null in the five canonical fields, then enforce a unique,
    // ascending date index.
    let df = df
        .lazy()
        .drop_nulls(Some(vec![
            col("date"),
            col("Open"),
            col("High"),
            col("Low"),
            col("Close"),
            col("Volume"),
        ]))
        .sort(
            ["date"],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .unique_stable(Some(vec!["date".into()]), UniqueKeepStrategy::First)
        .collect()?;

    if df.height() == 0 {
        return Err(SchemaError::Empty);
    }

    Ok(df)
}

/// Resolve the date column and promote it to dtype Date.
///
/// Accepted in order: an already-typed Date/Datetime column named
/// `date`/`Date`; a string column named `date`/`Date` parsed as `%Y-%m-%d`;
/// failing both, the first column is assumed to hold the dates. The
/// assumption is loud (a warning on stderr) and an unparseable fallback is
/// a hard `NoDateColumn` error rather than silently corrupt output.
fn promote_date_column(mut df: DataFrame) -> Result<DataFrame, SchemaError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let candidate = if names.iter().any(|n| n == "date") {
        "date".to_string()
    } else if names.iter().any(|n| n == "Date") {
        "Date".to_string()
    } else {
        let first = names.first().cloned().ok_or(SchemaError::Empty)?;
        eprintln!(
            "WARNING: no date column found; assuming first column '{first}' holds the dates"
        );
        first
    };

    if candidate != "date" {
        df.rename(&candidate, "date".into())?;
        // `DataFrame::rename` mutates the columns in place but leaves the
        // cached schema stale (it populates the cache while checking for
        // duplicates, before the rename takes effect). Flush it so the
        // `.lazy()` calls below see the renamed `date` column.
        df.clear_schema();
    }

    let dtype = df.column("date")?.dtype().clone();
    let df = match dtype {
        DataType::Date => df,
        DataType::Datetime(_, _) => df
            .lazy()
            .with_column(col("date").cast(DataType::Date))
            .collect()?,
        DataType::String => df
            .lazy()
            .with_column(col("date").str().to_date(StrptimeOptions {
                format: Some("%Y-%m-%d".into()),
                strict: false,
                ..Default::default()
            }))
            .collect()?,
        _ => return Err(SchemaError::NoDateColumn),
    };

    // A column that parsed to nothing was not a date column after all.
    let date_col = df.column("date")?;
    if date_col.null_count() == df.height() {
        return Err(SchemaError::NoDateColumn);
    }

    Ok(df)
}
