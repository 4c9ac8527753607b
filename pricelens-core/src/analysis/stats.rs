//! Summary statistics over the defined values of a series.

use serde::{Deserialize, Serialize};

use super::volatility::population_std;
use crate::domain::Series;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub last: f64,
}

impl SeriesStats {
    /// Compute statistics from the defined values. `None` when nothing is defined.
    pub fn compute(series: &Series) -> Option<Self> {
        let last = series.last_defined()?;
        let vals: Vec<f64> = series.defined().map(|(_, v)| v).collect();

        let count = vals.len();
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = vals.iter().sum::<f64>() / count as f64;

        Some(SeriesStats {
            count,
            min,
            max,
            mean,
            std_dev: population_std(&vals),
            last,
        })
    }

    /// Single-line report used by the CLI.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{label:<14} n={:<6} last={:<12.6} min={:<12.6} max={:<12.6} mean={:<12.6} sd={:.6}",
            self.count, self.last, self.min, self.max, self.mean, self.std_dev
        )
    }
}
