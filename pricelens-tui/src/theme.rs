//! Parrot/neon theme tokens for the PriceLens chart view
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (close price, titles)
//! - **Positive**: Neon green (long moving average)
//! - **Warning**: Neon orange (short moving average, histogram bars)
//! - **Neutral**: Cool purple (volatility)
//! - **Muted**: Steel blue (axes, secondary text)

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub neutral: Color,
    pub muted: Color,
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }

    /// Color for the `index`-th line in a panel. Single-line panels use the
    /// neutral tone so volatility stands apart from price.
    pub fn series_color(&self, index: usize, lines_in_panel: usize) -> Color {
        if lines_in_panel == 1 {
            return self.neutral;
        }
        match index % 4 {
            0 => self.accent,
            1 => self.warning,
            2 => self.positive,
            _ => self.negative,
        }
    }

    pub fn bar_color(&self) -> Color {
        self.warning
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_series_color() {
        let theme = Theme::default();
        assert_eq!(theme.series_color(0, 3), theme.accent);
        assert_eq!(theme.series_color(1, 3), theme.warning);
        assert_eq!(theme.series_color(2, 3), theme.positive);
        assert_eq!(theme.series_color(0, 1), theme.neutral);
    }
}
