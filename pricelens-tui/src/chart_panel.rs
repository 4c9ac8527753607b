//! Draws one chart panel: a multi-line chart or a bar histogram.

use ratatui::layout::Rect;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, BarChart, Block, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use pricelens_core::chart::{LineSeries, Panel, PanelKind};

use crate::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, panel: &Panel, theme: &Theme) {
    if panel.is_empty() {
        render_empty(f, area, panel, theme);
        return;
    }
    match &panel.kind {
        PanelKind::Lines(lines) => render_lines(f, area, panel, lines, theme),
        PanelKind::Bars(bars) => render_bars(f, area, panel, bars, theme),
    }
}

fn render_empty(f: &mut Frame, area: Rect, panel: &Panel, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Not enough data to draw this panel.",
            theme.muted(),
        )),
    ];
    let block = Block::bordered().title(Span::styled(panel.title.clone(), theme.title()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// `[min, max]` over every line, padded by 5% so lines don't sit on the border.
fn y_bounds(lines: &[LineSeries]) -> [f64; 2] {
    let (min_y, max_y) = lines
        .iter()
        .filter_map(LineSeries::y_bounds)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    let padding = ((max_y - min_y).abs() * 0.05).max(1e-9);
    [min_y - padding, max_y + padding]
}

fn x_max(lines: &[LineSeries]) -> f64 {
    lines
        .iter()
        .filter_map(|l| l.points.last().map(|p| p.0))
        .fold(1.0, f64::max)
}

fn render_lines(f: &mut Frame, area: Rect, panel: &Panel, lines: &[LineSeries], theme: &Theme) {
    let [y_min, y_max] = y_bounds(lines);

    let datasets: Vec<Dataset> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.points.is_empty())
        .map(|(i, l)| {
            Dataset::default()
                .name(l.name.clone())
                .marker(symbols::Marker::Braille)
                .style(theme.series_color(i, lines.len()))
                .graph_type(GraphType::Line)
                .data(&l.points)
        })
        .collect();

    let x_labels: Vec<Span> = panel
        .x_labels
        .iter()
        .map(|l| Span::styled(l.clone(), theme.muted()))
        .collect();

    let chart = Chart::new(datasets)
        .block(Block::bordered().title(Span::styled(panel.title.clone(), theme.title())))
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme.muted()))
                .style(theme.muted())
                .bounds([0.0, x_max(lines)])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(panel.y_label.clone(), theme.muted()))
                .style(theme.muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format_tick(y_min), theme.muted()),
                    Span::styled(format_tick((y_min + y_max) / 2.0), theme.muted()),
                    Span::styled(format_tick(y_max), theme.muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_bars(f: &mut Frame, area: Rect, panel: &Panel, bars: &[(String, u64)], theme: &Theme) {
    let data: Vec<(&str, u64)> = bars.iter().map(|(l, c)| (l.as_str(), *c)).collect();
    // Two border columns; at least one cell per bar.
    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / data.len().max(1)).clamp(1, u16::MAX as usize) as u16;

    let chart = BarChart::default()
        .block(Block::bordered().title(Span::styled(panel.title.clone(), theme.title())))
        .data(data.as_slice())
        .bar_width(bar_width)
        .bar_gap(0)
        .bar_style(theme.bar_color())
        .value_style(theme.text())
        .label_style(theme.muted());

    f.render_widget(chart, area);
}

/// Volatility values are tiny fractions; prices are not.
fn format_tick(v: f64) -> String {
    if v.abs() < 1.0 {
        format!("{v:.4}")
    } else {
        format!("{v:.2}")
    }
}
