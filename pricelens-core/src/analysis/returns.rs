//! Daily return.
//!
//! return[i] = (close[i] - close[i-1]) / close[i-1]
//! Index 0 has no previous close and is always undefined.

use crate::domain::Series;

pub fn daily_return(closes: &[f64]) -> Series {
    let mut values = vec![None; closes.len()];

    for (i, pair) in closes.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        if !prev.is_finite() || !curr.is_finite() || prev == 0.0 {
            continue;
        }
        values[i + 1] = Some((curr - prev) / prev);
    }

    values.into()
}
