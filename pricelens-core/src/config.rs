//! Analysis configuration.
//!
//! All tunables are explicit fields passed to the analyzer; nothing is read
//! from process-wide state. Loaded from an optional TOML file where every
//! field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Short moving-average window.
pub const DEFAULT_SMA_SHORT: usize = 50;
/// Long moving-average window.
pub const DEFAULT_SMA_LONG: usize = 200;
/// Rolling volatility window over daily returns.
pub const DEFAULT_VOLATILITY_WINDOW: usize = 20;
/// Bins for the price distribution histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// What to do with rows that still have no closing price after filling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Drop the rows. Downstream indices shift to close the gap.
    #[default]
    Compact,
    /// Keep the rows with an undefined close so every series stays aligned
    /// to the original dates.
    PreserveDates,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sma_short: usize,
    pub sma_long: usize,
    pub volatility_window: usize,
    pub histogram_bins: usize,
    pub alignment: AlignmentPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sma_short: DEFAULT_SMA_SHORT,
            sma_long: DEFAULT_SMA_LONG,
            volatility_window: DEFAULT_VOLATILITY_WINDOW,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            alignment: AlignmentPolicy::Compact,
        }
    }
}

impl AnalysisConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Windows and bin counts must be at least 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("volatility_window", self.volatility_window),
            ("histogram_bins", self.histogram_bins),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 1")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_windows() {
        let c = AnalysisConfig::default();
        assert_eq!(c.sma_short, 50);
        assert_eq!(c.sma_long, 200);
        assert_eq!(c.volatility_window, 20);
        assert_eq!(c.histogram_bins, 30);
        assert_eq!(c.alignment, AlignmentPolicy::Compact);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let c = AnalysisConfig::from_toml("sma_short = 10\nalignment = \"preserve_dates\"\n").unwrap();
        assert_eq!(c.sma_short, 10);
        assert_eq!(c.sma_long, 200);
        assert_eq!(c.alignment, AlignmentPolicy::PreserveDates);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(AnalysisConfig::from_toml("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn zero_window_rejected() {
        let err = AnalysisConfig::from_toml("volatility_window = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("volatility_window")));
    }

    #[test]
    fn unknown_alignment_is_parse_error() {
        let err = AnalysisConfig::from_toml("alignment = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = AnalysisConfig::from_file(Path::new("/nonexistent/pricelens.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn config_toml_roundtrip() {
        let c = AnalysisConfig {
            sma_short: 5,
            sma_long: 15,
            volatility_window: 3,
            histogram_bins: 12,
            alignment: AlignmentPolicy::PreserveDates,
        };
        let s = toml::to_string(&c).unwrap();
        assert_eq!(AnalysisConfig::from_toml(&s).unwrap(), c);
    }
}
