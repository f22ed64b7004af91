//! Plain-text rendition of the dashboard for pipes and non-interactive use.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use expense_core::formatting::{format_currency, format_percentage};
use expense_core::models::DATE_FORMAT;
use expense_data::analysis::{ForecastStatus, LedgerAnalysis};

use crate::charts::category_slices;
use crate::components::metric::{MODEL_UNREADABLE, TRAIN_FIRST_HINT};
use crate::table_view::{truncate_to_width, DESCRIPTION_WIDTH};

const RULE_WIDTH: usize = 60;

/// Left-align `text` in `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Right-align `text` in `width` terminal columns.
fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{text}", " ".repeat(fill))
}

fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// Write the full report for `analysis` to `out`.
pub fn write_report(
    out: &mut impl Write,
    analysis: &LedgerAnalysis,
    currency: &str,
) -> io::Result<()> {
    writeln!(out, "PERSONAL EXPENSE TRACKER")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    if analysis.is_empty() {
        writeln!(out, "No expenses added yet.")?;
        return write_forecast(out, &analysis.forecast, None, currency);
    }

    section(out, "Expense History")?;
    writeln!(
        out,
        "{} {} {} {}",
        pad("Date", 10),
        pad("Category", 13),
        pad("Description", DESCRIPTION_WIDTH),
        pad_left("Amount", 14)
    )?;
    for record in &analysis.history {
        writeln!(
            out,
            "{} {} {} {}",
            record.date.format(DATE_FORMAT),
            pad(record.category.as_str(), 13),
            pad(
                &truncate_to_width(&record.description, DESCRIPTION_WIDTH),
                DESCRIPTION_WIDTH
            ),
            pad_left(&format_currency(record.amount, currency), 14)
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Total Spent ({currency}): {}",
        format_currency(analysis.total_spent, currency)
    )?;

    section(out, "Monthly Summary")?;
    for m in &analysis.monthly {
        writeln!(
            out,
            "{}  {:>5} records  {}",
            m.month,
            m.count,
            pad_left(&format_currency(m.total, currency), 16)
        )?;
    }
    writeln!(
        out,
        "Average per month: {}",
        format_currency(analysis.totals.average_per_month(), currency)
    )?;

    section(out, "Spending by Category")?;
    for slice in category_slices(&analysis.categories, analysis.total_spent) {
        writeln!(
            out,
            "{} {}  {}",
            pad(slice.category.as_str(), 13),
            pad_left(&format_currency(slice.total, currency), 16),
            pad_left(&format_percentage(slice.share), 6)
        )?;
    }

    let last_total = analysis.monthly.last().map(|m| m.total);
    write_forecast(out, &analysis.forecast, last_total, currency)
}

fn write_forecast(
    out: &mut impl Write,
    forecast: &ForecastStatus,
    last_total: Option<f64>,
    currency: &str,
) -> io::Result<()> {
    section(out, "Expense Prediction")?;
    match forecast {
        ForecastStatus::ModelMissing => writeln!(out, "{TRAIN_FIRST_HINT}"),
        ForecastStatus::ModelUnreadable => {
            writeln!(out, "{MODEL_UNREADABLE}")?;
            writeln!(out, "{TRAIN_FIRST_HINT}")
        }
        ForecastStatus::NoData => writeln!(out, "Add some expenses to see a prediction."),
        ForecastStatus::Predicted {
            next_month, amount, ..
        } => {
            write!(
                out,
                "Predicted spending for next month ({next_month}): {}",
                format_currency(*amount, currency)
            )?;
            match last_total {
                Some(last) => writeln!(out, "  (last month: {})", format_currency(last, currency)),
                None => writeln!(out),
            }
        }
    }
}
