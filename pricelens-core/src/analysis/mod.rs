//! Time-series transforms over closing prices.
//!
//! Every transform is a pure function: a price or return series in, a series
//! of the same length out. Non-finite inputs are treated as missing, and any
//! output position that cannot be computed is `None`.
//!
//! The plain functions are total. The `try_` variants report an
//! [`AnalysisError::InvalidWindow`] instead of silently returning an
//! all-undefined series, so callers can branch on the problem.

pub mod analyzer;
pub mod histogram;
pub mod returns;
pub mod sma;
pub mod stats;
pub mod volatility;

pub use analyzer::{AnalysisReport, TimeSeriesAnalyzer};
pub use histogram::{Bin, Histogram};
pub use returns::daily_return;
pub use sma::{simple_moving_average, try_simple_moving_average};
pub use stats::SeriesStats;
pub use volatility::{rolling_volatility, try_rolling_volatility};

use thiserror::Error;

/// Errors reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("invalid window {window} for a series of length {len} (need 1 <= window <= len)")]
    InvalidWindow { window: usize, len: usize },

    #[error("no usable samples to analyze")]
    EmptyInput,
}

/// A window is usable when it is non-zero and fits inside the series.
pub fn check_window(window: usize, len: usize) -> Result<(), AnalysisError> {
    if window == 0 || window > len {
        return Err(AnalysisError::InvalidWindow { window, len });
    }
    Ok(())
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for analysis tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
