//! Synthetic data source for offline runs.
//!
//! Produces a weekday-only random walk from a starting price of 100.0. The RNG
//! is seeded from a BLAKE3 hash of the symbol, so the same symbol always yields
//! the same series.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::provider::{check_range, DataError, DataSource, MarketDataSource};
use crate::domain::Sample;

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    start_price: f64,
    max_daily_move: f64,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            max_daily_move: 0.03,
        }
    }
}

impl MarketDataSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Sample>, DataError> {
        check_range(start, end)?;
        info!(%symbol, "generating synthetic prices");

        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut samples = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current < end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                let daily_return: f64 = if self.max_daily_move > 0.0 {
                    rng.gen_range(-self.max_daily_move..self.max_daily_move)
                } else {
                    0.0
                };
                price *= 1.0 + daily_return;
                samples.push(Sample::new(current, price));
            }
            current += chrono::Duration::days(1);
        }

        Ok(samples)
    }
}
