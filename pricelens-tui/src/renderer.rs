//! Full-screen chart view: panels stacked vertically, `q` or `Esc` to close.

use std::io::{self, stdout, Stdout};
use std::sync::Once;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tracing::debug;

use pricelens_core::chart::{ChartRenderer, ChartSpec, RenderError};

use crate::chart_panel;
use crate::theme::Theme;

static PANIC_HOOK: Once = Once::new();

/// Restores the terminal before the default hook prints the panic.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stderr(), LeaveAlternateScreen);
            default_hook(info);
        }));
    });
}

/// Draws a whole chart into `area`: title bar, panels, key hint.
pub fn draw(f: &mut Frame, chart: &ChartSpec, theme: &Theme) {
    let area = f.area();
    let panel_count = chart.panels.len().max(1) as u32;

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(chart.panels.iter().map(|_| Constraint::Ratio(1, panel_count)));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_title(f, chunks[0], &chart.title, theme);
    for (panel, rect) in chart.panels.iter().zip(chunks.iter().skip(1)) {
        chart_panel::render(f, *rect, panel, theme);
    }
    draw_hint(f, chunks[chunks.len() - 1], theme);
}

fn draw_title(f: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let line = Line::from(Span::styled(format!(" {title}"), theme.title()));
    f.render_widget(
        Paragraph::new(line).style(Style::default().bg(theme.background)),
        area,
    );
}

fn draw_hint(f: &mut Frame, area: Rect, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" q", theme.title()),
        Span::styled("/", theme.muted()),
        Span::styled("Esc", theme.title()),
        Span::styled(" close", theme.muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Esc)
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

/// Renders charts on the real terminal and blocks until the user closes them.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    theme: Theme,
}

impl TerminalRenderer {
    fn run(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        chart: &ChartSpec,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| draw(f, chart, &self.theme))?;

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if is_quit(key.code, key.modifiers) {
                        return Ok(());
                    }
                }
                // Resize and everything else just redraws.
                _ => {}
            }
        }
    }
}

impl ChartRenderer for TerminalRenderer {
    fn render(&mut self, chart: &ChartSpec) -> Result<(), RenderError> {
        if chart.is_empty() {
            return Err(RenderError::Empty(chart.title.clone()));
        }
        debug!(title = %chart.title, panels = chart.panels.len(), "opening chart view");

        install_panic_hook();
        enable_raw_mode()?;

        with_restore(
            || {
                let mut terminal = open_terminal()?;
                let outcome = self.run(&mut terminal, chart);
                outcome.and(terminal.show_cursor())
            },
            restore_terminal,
        )
        .map_err(RenderError::from)
    }
}

fn open_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)
}

/// Run `session`, then `restore` no matter how the session ended. The
/// session's error wins over the restore's.
fn with_restore<T>(
    session: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    let result = session();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}
