//! Chart descriptions and the renderer seam.
//!
//! The core only describes what to draw. A [`ChartRenderer`] turns a
//! [`ChartSpec`] into pixels or terminal cells; rendering is a side effect.

use thiserror::Error;

use crate::analysis::{AnalysisReport, Histogram};
use crate::domain::Series;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("nothing to draw: {0}")]
    Empty(String),
}

/// One named line. Points are `(index, value)`; undefined values are omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl LineSeries {
    pub fn from_series(name: impl Into<String>, series: &Series) -> Self {
        Self {
            name: name.into(),
            points: series.defined().map(|(i, v)| (i as f64, v)).collect(),
        }
    }

    /// `(min, max)` of the y values, if any.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let min = self.points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    Lines(Vec<LineSeries>),
    /// `(label, count)` per bar.
    Bars(Vec<(String, u64)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub y_label: String,
    /// Labels spread along the x axis (first, middle, last).
    pub x_labels: Vec<String>,
    pub kind: PanelKind,
}

impl Panel {
    pub fn is_empty(&self) -> bool {
        match &self.kind {
            PanelKind::Lines(lines) => lines.iter().all(|l| l.points.is_empty()),
            PanelKind::Bars(bars) => bars.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl ChartSpec {
    /// Price with both moving averages on top, volatility below.
    pub fn price_and_volatility(report: &AnalysisReport, symbol: &str) -> Self {
        let x_labels = date_labels(report);
        Self {
            title: format!("{symbol} price analysis"),
            panels: vec![
                Panel {
                    title: "Price and Moving Averages".into(),
                    y_label: "Price".into(),
                    x_labels: x_labels.clone(),
                    kind: PanelKind::Lines(vec![
                        LineSeries::from_series("Close Price", &report.close),
                        LineSeries::from_series(
                            format!("{}-Day MA", report.sma_short_window),
                            &report.sma_short,
                        ),
                        LineSeries::from_series(
                            format!("{}-Day MA", report.sma_long_window),
                            &report.sma_long,
                        ),
                    ]),
                },
                Panel {
                    title: "Volatility".into(),
                    y_label: "Volatility".into(),
                    x_labels,
                    kind: PanelKind::Lines(vec![LineSeries::from_series(
                        format!("{}-Day Volatility", report.volatility_window),
                        &report.volatility,
                    )]),
                },
            ],
        }
    }

    /// Closing-price distribution as a single bar panel.
    pub fn price_distribution(histogram: &Histogram, symbol: &str) -> Self {
        let precision = histogram
            .bins
            .first()
            .map_or(0, |b| label_precision(b.upper - b.lower));
        let bars: Vec<(String, u64)> = histogram
            .bins
            .iter()
            .map(|b| {
                let mid = (b.lower + b.upper) / 2.0;
                (format!("{mid:.precision$}"), b.count as u64)
            })
            .collect();
        let x_labels = match (histogram.bins.first(), histogram.bins.last()) {
            (Some(first), Some(last)) => {
                vec![format!("{:.2}", first.lower), format!("{:.2}", last.upper)]
            }
            _ => Vec::new(),
        };
        Self {
            title: format!("{symbol} price distribution"),
            panels: vec![Panel {
                title: "Closing Price Distribution".into(),
                y_label: "Frequency".into(),
                x_labels,
                kind: PanelKind::Bars(bars),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(Panel::is_empty)
    }
}

/// Decimals needed for neighboring bin midpoints to print differently.
fn label_precision(bin_width: f64) -> usize {
    if !bin_width.is_finite() || bin_width <= 0.0 || bin_width >= 1.0 {
        return 0;
    }
    ((-bin_width.log10()).floor() + 1.0).clamp(1.0, 8.0) as usize
}

fn date_labels(report: &AnalysisReport) -> Vec<String> {
    match report.dates.len() {
        0 => Vec::new(),
        1 => vec![report.dates[0].to_string()],
        n => vec![
            report.dates[0].to_string(),
            report.dates[n / 2].to_string(),
            report.dates[n - 1].to_string(),
        ],
    }
}

/// Draws a chart. Side effect only.
pub trait ChartRenderer {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), RenderError>;
}

/// Renderer for headless runs: draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ChartRenderer for NullRenderer {
    fn render(&mut self, _chart: &ChartSpec) -> Result<(), RenderError> {
        Ok(())
    }
}
