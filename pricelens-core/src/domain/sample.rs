//! Sample — one dated closing price — and the cleaned table built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closing price for a single symbol on a single day.
///
/// `close` is `None` when the provider had no price for that date. In a cleaned
/// [`PriceTable`] this only happens under the date-preserving alignment policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

impl Sample {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close: Some(close),
        }
    }

    pub fn missing(date: NaiveDate) -> Self {
        Self { date, close: None }
    }
}

/// Cleaned, date-ordered closing prices with unique dates.
///
/// Built once per run by `data::clean` and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    samples: Vec<Sample>,
}

impl PriceTable {
    /// Build a table, sorting by date and keeping the first sample per date.
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.date);
        samples.dedup_by_key(|s| s.date);
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.samples.iter().map(|s| s.date).collect()
    }

    /// Closing prices as a dense slice-friendly vector. Missing closes become NaN,
    /// which every analyzer transform treats as undefined.
    pub fn closes(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.close.unwrap_or(f64::NAN))
            .collect()
    }

    /// Number of samples with a usable close.
    pub fn defined_closes(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.close.is_some_and(f64::is_finite))
            .count()
    }
}
