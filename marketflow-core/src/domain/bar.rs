//! RawBar — the provider-level daily price record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily bar as returned by a data provider, before normalization.
///
/// Provider payloads routinely carry nulls (halted sessions, missing volume
/// on thin days), so every price/volume field is optional here. The schema
/// normalizer drops incomplete rows before indicator computation; the raw
/// store serializes `None` as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// True when every OHLCV field is absent (holiday/non-trading row).
    pub fn is_blank(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }

    /// True when all five OHLCV fields are present.
    pub fn is_complete(&self) -> bool {
        self.open.is_some()
            && self.high.is_some()
            && self.low.is_some()
            && self.close.is_some()
            && self.volume.is_some()
    }
}
