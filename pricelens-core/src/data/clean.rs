//! Cleaning raw rows into a [`PriceTable`].
//!
//! Order of operations:
//! 1. sort by date, keep the first row for each date
//! 2. blank closes: forward fill, then backward fill the leading gap, copying
//!    the neighboring cell whether or not it is numeric
//! 3. non-numeric closes (and blanks that copied one) become missing; the
//!    originals are reported
//! 4. rows still without a close are dropped or kept as gaps per [`AlignmentPolicy`]

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::provider::DataError;
use super::store::{RawClose, RawRow};
use crate::config::AlignmentPolicy;
use crate::domain::{PriceTable, Sample};

/// A close value that could not be coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedClose {
    pub line: u64,
    pub date: NaiveDate,
    pub raw: String,
}

/// What cleaning did to the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub forward_filled: usize,
    pub backward_filled: usize,
    pub malformed: Vec<MalformedClose>,
    /// Blank cells filled from a non-numeric neighbor, so still missing.
    pub inherited_malformed: usize,
    /// Rows removed for lacking a close (Compact policy only).
    pub dropped: usize,
    /// Rows kept with an undefined close (PreserveDates policy only).
    pub gaps: usize,
}

impl CleaningReport {
    /// True when the table is exactly the input rows.
    pub fn is_clean(&self) -> bool {
        self.duplicates_removed == 0
            && self.forward_filled == 0
            && self.backward_filled == 0
            && self.malformed.is_empty()
            && self.inherited_malformed == 0
    }
}

/// Clean raw rows. Fails with `EmptyInput` when no row ends up with a close.
pub fn clean(
    rows: &[RawRow],
    policy: AlignmentPolicy,
) -> Result<(PriceTable, CleaningReport), DataError> {
    let mut report = CleaningReport {
        input_rows: rows.len(),
        ..CleaningReport::default()
    };

    let mut ordered: Vec<&RawRow> = rows.iter().collect();
    ordered.sort_by_key(|r| r.date);
    ordered.dedup_by_key(|r| r.date);
    report.duplicates_removed = rows.len() - ordered.len();

    // Fill runs on the raw cells: a blank copies its nearest non-blank
    // neighbor, numeric or not, and coercion happens afterwards.
    let mut closes: Vec<Option<f64>> = Vec::with_capacity(ordered.len());
    let mut last: Option<Option<f64>> = None;
    let mut leading_blanks = Vec::new();

    for (i, row) in ordered.iter().enumerate() {
        match &row.close {
            RawClose::Value(v) => {
                last = Some(Some(*v));
                closes.push(Some(*v));
            }
            RawClose::Malformed(raw) => {
                warn!(line = row.line, date = %row.date, raw = %raw, "non-numeric close");
                report.malformed.push(MalformedClose {
                    line: row.line,
                    date: row.date,
                    raw: raw.clone(),
                });
                last = Some(None);
                closes.push(None);
            }
            RawClose::Blank => match last {
                Some(Some(v)) => {
                    report.forward_filled += 1;
                    closes.push(Some(v));
                }
                Some(None) => {
                    report.inherited_malformed += 1;
                    closes.push(None);
                }
                None => {
                    leading_blanks.push(i);
                    closes.push(None);
                }
            },
        }
    }

    let first = ordered.iter().find_map(|r| match &r.close {
        RawClose::Value(v) => Some(Some(*v)),
        RawClose::Malformed(_) => Some(None),
        RawClose::Blank => None,
    });
    for i in leading_blanks {
        match first {
            Some(Some(v)) => {
                closes[i] = Some(v);
                report.backward_filled += 1;
            }
            Some(None) => report.inherited_malformed += 1,
            None => {}
        }
    }

    let mut samples = Vec::with_capacity(ordered.len());
    for (row, close) in ordered.iter().zip(closes) {
        match (close, policy) {
            (Some(v), _) => samples.push(Sample::new(row.date, v)),
            (None, AlignmentPolicy::Compact) => report.dropped += 1,
            (None, AlignmentPolicy::PreserveDates) => {
                report.gaps += 1;
                samples.push(Sample::missing(row.date));
            }
        }
    }

    let table = PriceTable::new(samples);
    if table.defined_closes() == 0 {
        return Err(DataError::EmptyInput("cleaned table".into()));
    }

    debug!(
        rows = table.len(),
        forward_filled = report.forward_filled,
        backward_filled = report.backward_filled,
        malformed = report.malformed.len(),
        inherited_malformed = report.inherited_malformed,
        dropped = report.dropped,
        "cleaned price table"
    );

    Ok((table, report))
}
