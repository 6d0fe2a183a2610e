//! Indicator kernels and the enrichment step.
//!
//! The kernels are plain `f64`-slice functions (NaN = undefined), computed
//! once per symbol; `enrich` wires them onto the canonical frame as
//! nullable columns.

pub mod atr;
pub mod ema;
pub mod enrich;
pub mod rsi;
pub mod vwap;

pub use atr::{atr, true_range, wilder_smooth};
pub use ema::ema;
pub use enrich::{enrich, ATR_WINDOW, EMA_LONG_WINDOW, EMA_SHORT_WINDOW, RSI_WINDOW};
pub use rsi::rsi;
pub use vwap::vwap;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
