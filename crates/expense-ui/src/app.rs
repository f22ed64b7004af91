//! Dashboard state and TUI event loop.
//!
//! [`App`] owns the theme, the currency, and the selected view. The ledger
//! snapshot is loaded once up front; the loop only redraws and handles keys.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use expense_data::analysis::LedgerAnalysis;

use crate::charts::{self, TrendSeries};
use crate::components::header::Header;
use crate::components::metric::{ForecastIndicator, TotalSpentMetric};
use crate::table_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// Which panel the dashboard body shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Every record, newest first.
    History,
    /// Monthly table plus trend chart.
    Summary,
    /// Category breakdown bars.
    Categories,
    /// Next-month prediction or training guidance.
    Forecast,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::History,
        ViewMode::Summary,
        ViewMode::Categories,
        ViewMode::Forecast,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::History => "History",
            ViewMode::Summary => "Summary",
            ViewMode::Categories => "Categories",
            ViewMode::Forecast => "Forecast",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ViewMode::History => 0,
            ViewMode::Summary => 1,
            ViewMode::Categories => 2,
            ViewMode::Forecast => 3,
        }
    }

    /// The view after this one, wrapping around.
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the dashboard.
pub struct App {
    pub theme: Theme,
    pub view_mode: ViewMode,
    /// Currency symbol in front of every amount.
    pub currency: String,
    /// Ledger location shown in the header.
    pub ledger_label: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, currency: String, ledger_label: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            view_mode: ViewMode::History,
            currency,
            ledger_label,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Show `analysis` until the user quits with `q`, `Q`, `Esc` or `Ctrl+C`.
    pub fn run_dashboard(mut self, analysis: &LedgerAnalysis) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame, analysis)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press to the view state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.view_mode = self.view_mode.next(),
            KeyCode::BackTab | KeyCode::Left => self.view_mode = self.view_mode.previous(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.view_mode = ViewMode::ALL[idx];
            }
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the whole dashboard into `frame`.
    pub fn render(&self, frame: &mut Frame, analysis: &LedgerAnalysis) {
        let [header_area, metric_area, tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = Header::new(&self.ledger_label, &self.currency, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), header_area);

        let metric = TotalSpentMetric::new(
            analysis.total_spent,
            analysis.totals.months,
            &self.currency,
            &self.theme,
        );
        frame.render_widget(Paragraph::new(metric.to_line()), metric_area);

        let tabs = Tabs::new(
            ViewMode::ALL
                .iter()
                .map(|v| format!("{} {}", v.index() + 1, v.title())),
        )
        .select(self.view_mode.index())
        .style(self.theme.tab_inactive)
        .highlight_style(self.theme.tab_active);
        frame.render_widget(tabs, tabs_area);

        self.render_body(frame, body_area, analysis);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab/←/→ or 1-4: switch view   q: quit",
                self.theme.dim,
            ))),
            footer_area,
        );
    }

    fn render_body(&self, frame: &mut Frame, area: Rect, analysis: &LedgerAnalysis) {
        if analysis.is_empty() && self.view_mode != ViewMode::Forecast {
            table_view::render_no_data(frame, area, &self.theme);
            return;
        }

        match self.view_mode {
            ViewMode::History => {
                table_view::render_history_table(
                    frame,
                    area,
                    &analysis.history,
                    &self.currency,
                    &self.theme,
                );
            }
            ViewMode::Summary => {
                let [table_area, chart_area] =
                    Layout::horizontal([Constraint::Length(42), Constraint::Min(20)]).areas(area);
                table_view::render_monthly_table(
                    frame,
                    table_area,
                    &analysis.monthly,
                    &analysis.totals,
                    &self.currency,
                    &self.theme,
                );
                let series = TrendSeries::build(&analysis.monthly, &analysis.forecast);
                charts::render_trend_chart(frame, chart_area, &series, &self.currency, &self.theme);
            }
            ViewMode::Categories => {
                let slices = charts::category_slices(&analysis.categories, analysis.total_spent);
                charts::render_category_chart(frame, area, &slices, &self.currency, &self.theme);
            }
            ViewMode::Forecast => {
                let indicator = ForecastIndicator::new(
                    &analysis.forecast,
                    analysis.monthly.last().map(|m| m.total),
                    &self.currency,
                    &self.theme,
                );
                let mut lines = vec![Line::from("")];
                lines.extend(indicator.to_lines());
                frame.render_widget(
                    Paragraph::new(Text::from(lines)).block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(" Expense Prediction "),
                    ),
                    area,
                );
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
