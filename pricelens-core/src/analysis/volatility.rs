//! Rolling volatility.
//!
//! Population standard deviation (N divisor) of the trailing `window` returns.
//! Fed the aligned daily-return series, whose index 0 is undefined, the first
//! defined value lands at index `window`.

use super::{check_window, AnalysisError};
use crate::domain::Series;

/// Population standard deviation of a non-empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

pub fn rolling_volatility(returns: &Series, window: usize) -> Series {
    let n = returns.len();
    if check_window(window, n).is_err() {
        return Series::undefined(n);
    }

    let mut values = vec![None; n];
    let mut buf = Vec::with_capacity(window);

    for end in window..=n {
        buf.clear();
        for v in &returns.values()[(end - window)..end] {
            match v {
                Some(x) => buf.push(*x),
                None => break,
            }
        }
        if buf.len() == window {
            values[end - 1] = Some(population_std(&buf));
        }
    }

    values.into()
}

/// Rolling volatility that reports an unusable window.
pub fn try_rolling_volatility(returns: &Series, window: usize) -> Result<Series, AnalysisError> {
    check_window(window, returns.len())?;
    Ok(rolling_volatility(returns, window))
}
