//! Price distribution histogram.
//!
//! Equal-width bins spanning [min, max] of the defined values. The last bin is
//! closed on the right so the maximum is counted. When every value is equal the
//! range is widened to [v - 0.5, v + 0.5].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bucket the finite entries of `values` into `bins` equal-width bins.
    ///
    /// Zero bins or no finite values give an empty histogram.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if bins == 0 || finite.is_empty() {
            return Self::default();
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in &finite {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
                count,
            })
            .collect();

        Self { bins }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Largest single-bin count.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn histogram_counts_every_value() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 5.0];
        let h = Histogram::compute(&values, 4);
        assert_eq!(h.bins.len(), 4);
        assert_eq!(h.total(), values.len());
        // width 1.0: [1,2) [2,3) [3,4) [4,5]
        let counts: Vec<usize> = h.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1, 2]);
        assert_approx(h.bins[0].lower, 1.0, DEFAULT_EPSILON);
        assert_approx(h.bins[3].upper, 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn histogram_skips_non_finite() {
        let h = Histogram::compute(&[1.0, f64::NAN, 3.0], 2);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn histogram_constant_values() {
        let h = Histogram::compute(&[7.0, 7.0, 7.0], 3);
        assert_eq!(h.total(), 3);
        assert_eq!(h.max_count(), 3);
        assert_approx(h.bins[0].lower, 6.5, DEFAULT_EPSILON);
        assert_approx(h.bins[2].upper, 7.5, DEFAULT_EPSILON);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        assert!(Histogram::compute(&[], 30).is_empty());
        assert!(Histogram::compute(&[1.0, 2.0], 0).is_empty());
        assert!(Histogram::compute(&[f64::NAN], 5).is_empty());
    }
}
