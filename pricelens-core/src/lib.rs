//! PriceLens Core — price samples, cleaning, time-series transforms, data sources.
//!
//! This crate contains the analytics core:
//! - Domain types (samples, cleaned price tables, aligned series)
//! - Time-series analyzer: daily return, simple moving averages, rolling volatility
//! - Cleaning with forward/backward fill and an explicit alignment policy
//! - Market data sources (Yahoo Finance, synthetic) behind one trait
//! - Flat CSV store for fetched data and augmented exports
//! - Chart descriptions consumed by a renderer

pub mod analysis;
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;

pub use analysis::{AnalysisError, AnalysisReport, TimeSeriesAnalyzer};
pub use config::{AlignmentPolicy, AnalysisConfig, ConfigError};
pub use data::DataError;
pub use domain::{PriceTable, Sample, Series};
