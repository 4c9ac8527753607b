//! Domain types for PriceLens

pub mod sample;
pub mod series;

pub use sample::{PriceTable, Sample};
pub use series::Series;
