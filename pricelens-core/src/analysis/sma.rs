//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a trailing window.
//! First defined value at index window-1. A window that contains a missing
//! close is undefined.

use super::{check_window, AnalysisError};
use crate::domain::Series;

/// SMA over `closes`. Zero or oversized windows yield an all-undefined series.
pub fn simple_moving_average(closes: &[f64], window: usize) -> Series {
    let n = closes.len();
    if check_window(window, n).is_err() {
        return Series::undefined(n);
    }

    let mut values = vec![None; n];
    let mut sum = 0.0;
    // Missing values are kept out of the running sum and counted instead.
    let mut missing = 0usize;

    for i in 0..n {
        let entering = closes[i];
        if entering.is_finite() {
            sum += entering;
        } else {
            missing += 1;
        }

        if i >= window {
            let leaving = closes[i - window];
            if leaving.is_finite() {
                sum -= leaving;
            } else {
                missing -= 1;
            }
        }

        if i + 1 >= window && missing == 0 {
            values[i] = Some(sum / window as f64);
        }

        // Resync after a full window to keep rounding drift bounded.
        if (i + 1) % window == 0 && missing == 0 {
            sum = closes[(i + 1 - window)..=i].iter().sum();
        }
    }

    values.into()
}

/// SMA that reports an unusable window instead of returning all-undefined.
pub fn try_simple_moving_average(closes: &[f64], window: usize) -> Result<Series, AnalysisError> {
    check_window(window, closes.len())?;
    Ok(simple_moving_average(closes, window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_3_basic() {
        let result = simple_moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(result.values(), &[None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn sma_5_basic() {
        let result = simple_moving_average(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0], 5);
        assert_eq!(result.len(), 7);
        for i in 0..4 {
            assert_eq!(result.get(i), None, "expected undefined at index {i}");
        }
        assert_approx(result.get(4).unwrap(), 12.0, DEFAULT_EPSILON);
        assert_approx(result.get(5).unwrap(), 13.0, DEFAULT_EPSILON);
        assert_approx(result.get(6).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let result = simple_moving_average(&[100.0, 200.0, 300.0], 1);
        assert_eq!(result.values(), &[Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn sma_window_equal_to_len() {
        let result = simple_moving_average(&[2.0, 4.0, 6.0], 3);
        assert_eq!(result.values(), &[None, None, Some(4.0)]);
    }

    #[test]
    fn sma_missing_value_propagation() {
        let closes = [10.0, 11.0, f64::NAN, 13.0, 14.0, 15.0];
        let result = simple_moving_average(&closes, 3);
        // windows [10,11,NaN], [11,NaN,13], [NaN,13,14] are undefined
        assert_eq!(result.get(2), None);
        assert_eq!(result.get(3), None);
        assert_eq!(result.get(4), None);
        assert_approx(result.get(5).unwrap(), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_zero_window_is_all_undefined() {
        let result = simple_moving_average(&[1.0, 2.0, 3.0], 0);
        assert_eq!(result.len(), 3);
        assert!(result.is_all_undefined());
    }

    #[test]
    fn sma_window_longer_than_series() {
        let result = simple_moving_average(&[10.0, 11.0], 5);
        assert_eq!(result.len(), 2);
        assert!(result.is_all_undefined());
    }

    #[test]
    fn sma_empty_input() {
        assert!(simple_moving_average(&[], 3).is_empty());
    }

    #[test]
    fn try_sma_reports_invalid_window() {
        assert_eq!(
            try_simple_moving_average(&[1.0, 2.0], 0),
            Err(AnalysisError::InvalidWindow { window: 0, len: 2 })
        );
        assert_eq!(
            try_simple_moving_average(&[1.0, 2.0], 3),
            Err(AnalysisError::InvalidWindow { window: 3, len: 2 })
        );
        assert!(try_simple_moving_average(&[1.0, 2.0], 2).is_ok());
    }

    #[test]
    fn sma_matches_direct_mean_over_long_series() {
        let closes: Vec<f64> = (0..1_000)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 25.0)
            .collect();
        let window = 50;
        let result = simple_moving_average(&closes, window);
        for i in (window - 1)..closes.len() {
            let direct = closes[(i + 1 - window)..=i].iter().sum::<f64>() / window as f64;
            assert_approx(result.get(i).unwrap(), direct, 1e-9);
        }
    }
}
