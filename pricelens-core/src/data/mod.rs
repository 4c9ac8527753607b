//! Data sources, CSV persistence, and cleaning

pub mod clean;
pub mod dates;
pub mod provider;
pub mod store;
pub mod synthetic;
pub mod yahoo;

pub use clean::{clean, CleaningReport, MalformedClose};
pub use provider::{DataError, DataSource, MarketDataSource};
pub use store::{read_rows, CsvStore, RawClose, RawRow, TabularStore};
pub use synthetic::SyntheticSource;
pub use yahoo::YahooSource;
