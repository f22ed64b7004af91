//! Table views for the expense dashboard.
//!
//! Renders bordered [`ratatui::widgets::Table`]s: the full record history,
//! newest first, and the monthly summary with a highlighted totals row.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use expense_core::formatting::format_currency;
use expense_core::models::{ExpenseRecord, MonthlyAggregate, DATE_FORMAT};
use expense_data::aggregator::LedgerTotals;

use crate::themes::Theme;

/// Display width given to the description column.
pub const DESCRIPTION_WIDTH: usize = 36;

/// Cut `text` to at most `max_width` terminal columns, ending in `…` when
/// anything was dropped.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Render every record, one row each, in the order given.
pub fn render_history_table(
    frame: &mut Frame,
    area: Rect,
    records: &[ExpenseRecord],
    currency: &str,
    theme: &Theme,
) {
    let header = Row::new(
        ["Date", "Category", "Description", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(record.date.format(DATE_FORMAT).to_string()),
                Cell::from(record.category.as_str()).style(theme.category_style(record.category)),
                Cell::from(truncate_to_width(&record.description, DESCRIPTION_WIDTH)),
                Cell::from(Line::from(format_currency(record.amount, currency)).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(15),
        Constraint::Length(DESCRIPTION_WIDTH as u16 + 2),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Expense History ({} records) ", records.len())),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render one row per month followed by a highlighted totals row.
pub fn render_monthly_table(
    frame: &mut Frame,
    area: Rect,
    monthly: &[MonthlyAggregate],
    totals: &LedgerTotals,
    currency: &str,
    theme: &Theme,
) {
    let header = Row::new(
        ["Month", "Records", "Total"]
            .iter()
            .map(|h| Cell::from(*h).style(theme.table_header)),
    )
    .height(1);

    let mut rows: Vec<Row> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(m.month.to_string()),
                Cell::from(m.count.to_string()),
                Cell::from(Line::from(format_currency(m.total, currency)).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(totals.count.to_string()),
            Cell::from(Line::from(format_currency(totals.total, currency)).right_aligned()),
        ])
        .style(theme.table_total),
    );
    rows.push(
        Row::new(vec![
            Cell::from("AVG/MONTH"),
            Cell::from(""),
            Cell::from(
                Line::from(format_currency(totals.average_per_month(), currency)).right_aligned(),
            ),
        ])
        .style(theme.dim),
    );

    let widths = [
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monthly Summary "),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Placeholder shown when the ledger has no records.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No expenses added yet.", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Record one with: expense-tracker add --category Food --amount 250",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Expense Tracker "),
        ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
