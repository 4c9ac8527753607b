//! Market data source trait and structured error types.
//!
//! The MarketDataSource trait abstracts over where prices come from (Yahoo
//! Finance, synthetic data) so the pipeline can swap implementations and tests
//! can run offline.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Sample;

/// Structured error types for data operations.
///
/// These are designed to be displayable in both CLI and log output.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no rows available for {0}")]
    EmptyInput(String),

    #[error("malformed file {}: {reason}", path.display())]
    MalformedFile { path: PathBuf, reason: String },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
    CsvFile,
}

/// Trait for market data sources.
///
/// Returns date-ordered samples; an empty vector means the source had no data
/// for the range. One request per call: no caching and no retries.
pub trait MarketDataSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn kind(&self) -> DataSource;

    /// Fetch daily closing prices for a symbol dated in `[start, end)`.
    /// `end` itself is excluded, so `2022-01-01..2023-01-01` is calendar 2022.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Sample>, DataError>;
}

/// Reject ranges where `start` falls after `end`.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), DataError> {
    if start > end {
        return Err(DataError::InvalidDateRange { start, end });
    }
    Ok(())
}
