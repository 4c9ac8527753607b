//! Series — a derived column, index-aligned to its source samples.

use serde::{Deserialize, Serialize};

/// Derived values aligned by index to the samples they were computed from.
///
/// Positions where a value cannot be computed (window not yet full, missing
/// input, division by zero) hold `None` rather than a placeholder number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    values: Vec<Option<f64>>,
}

impl Series {
    /// A series of `len` undefined values.
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, or `None` when undefined or out of bounds.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Iterate `(index, value)` over defined positions only.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_all_undefined(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Last defined value, if any.
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }
}

/// Non-finite inputs become undefined.
impl From<&[f64]> for Series {
    fn from(values: &[f64]) -> Self {
        values
            .iter()
            .map(|&v| if v.is_finite() { Some(v) } else { None })
            .collect()
    }
}

impl FromIterator<Option<f64>> for Series {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
