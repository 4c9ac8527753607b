//! PriceLens terminal charts.
//!
//! Implements [`pricelens_core::chart::ChartRenderer`] on top of ratatui:
//! line panels for price, moving averages and volatility, a bar panel for
//! the closing-price histogram.

pub mod chart_panel;
pub mod renderer;
pub mod theme;

pub use renderer::{draw, TerminalRenderer};
pub use theme::Theme;
