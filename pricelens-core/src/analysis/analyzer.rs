//! TimeSeriesAnalyzer — runs every transform over a cleaned price table.

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::histogram::Histogram;
use super::returns::daily_return;
use super::sma::try_simple_moving_average;
use super::volatility::try_rolling_volatility;
use super::AnalysisError;
use crate::config::AnalysisConfig;
use crate::domain::{PriceTable, Series};

/// The cleaned table augmented with its derived columns.
///
/// Every series has the same length as `dates`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub dates: Vec<NaiveDate>,
    pub close: Series,
    pub daily_return: Series,
    pub sma_short: Series,
    pub sma_long: Series,
    pub volatility: Series,
    pub sma_short_window: usize,
    pub sma_long_window: usize,
    pub volatility_window: usize,
    /// Window problems hit while computing. The affected series are all-undefined.
    pub warnings: Vec<AnalysisError>,
}

impl AnalysisReport {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column headers for the flat export, in column order.
    pub fn column_names(&self) -> Vec<String> {
        vec![
            "Date".to_string(),
            "Close".to_string(),
            "Daily Return".to_string(),
            format!("SMA_{}", self.sma_short_window),
            format!("SMA_{}", self.sma_long_window),
            "Volatility".to_string(),
        ]
    }

    /// Derived values for row `index`, in export column order after `Date`.
    pub fn row(&self, index: usize) -> [Option<f64>; 5] {
        [
            self.close.get(index),
            self.daily_return.get(index),
            self.sma_short.get(index),
            self.sma_long.get(index),
            self.volatility.get(index),
        ]
    }
}

/// Pure, deterministic transforms over closing prices, parameterized by an
/// explicit [`AnalysisConfig`].
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesAnalyzer {
    config: AnalysisConfig,
}

impl TimeSeriesAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Compute daily return, both moving averages and rolling volatility.
    ///
    /// Fails only when the table has no usable close. Windows that do not fit
    /// the series are recorded in `warnings` and produce all-undefined columns.
    pub fn analyze(&self, table: &PriceTable) -> Result<AnalysisReport, AnalysisError> {
        if table.defined_closes() == 0 {
            return Err(AnalysisError::EmptyInput);
        }

        let closes = table.closes();
        let mut warnings = Vec::new();
        let mut or_undefined = |result: Result<Series, AnalysisError>| {
            result.unwrap_or_else(|e| {
                warn!("{e}");
                warnings.push(e);
                Series::undefined(closes.len())
            })
        };

        let returns = daily_return(&closes);
        let sma_short = or_undefined(try_simple_moving_average(&closes, self.config.sma_short));
        let sma_long = or_undefined(try_simple_moving_average(&closes, self.config.sma_long));
        let volatility = or_undefined(try_rolling_volatility(
            &returns,
            self.config.volatility_window,
        ));

        debug!(
            rows = closes.len(),
            sma_short = sma_short.defined_count(),
            sma_long = sma_long.defined_count(),
            volatility = volatility.defined_count(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            dates: table.dates(),
            close: Series::from(closes.as_slice()),
            daily_return: returns,
            sma_short,
            sma_long,
            volatility,
            sma_short_window: self.config.sma_short,
            sma_long_window: self.config.sma_long,
            volatility_window: self.config.volatility_window,
            warnings,
        })
    }

    /// Distribution of closing prices using the configured bin count.
    pub fn histogram(&self, table: &PriceTable) -> Histogram {
        Histogram::compute(&table.closes(), self.config.histogram_bins)
    }
}
