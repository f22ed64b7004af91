use expense_core::formatting::{format_currency, format_percentage, percentage};
use expense_data::analysis::ForecastStatus;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Guidance shown wherever a prediction would appear but no model exists.
pub const TRAIN_FIRST_HINT: &str = "Train the model first by running: expense-tracker train";

/// Shown when a model file exists but cannot be parsed.
pub const MODEL_UNREADABLE: &str = "The saved model could not be read.";

// ── TotalSpentMetric ─────────────────────────────────────────────────────────

/// Headline figure: the sum of every amount in the ledger.
///
/// Format: `"Total Spent (₹): ₹12,345.00  across 4 months"`
pub struct TotalSpentMetric<'a> {
    pub total: f64,
    pub months: u32,
    pub currency: &'a str,
    pub theme: &'a Theme,
}

impl<'a> TotalSpentMetric<'a> {
    pub fn new(total: f64, months: u32, currency: &'a str, theme: &'a Theme) -> Self {
        Self {
            total,
            months,
            currency,
            theme,
        }
    }

    pub fn to_line(&self) -> Line<'a> {
        let plural = if self.months == 1 { "" } else { "s" };
        Line::from(vec![
            Span::styled(format!("Total Spent ({}): ", self.currency), self.theme.label),
            Span::styled(format_currency(self.total, self.currency), self.theme.value),
            Span::styled(
                format!("  across {} month{plural}", self.months),
                self.theme.dim,
            ),
        ])
    }
}

// ── ForecastIndicator ────────────────────────────────────────────────────────

/// Next-month prediction, compared against the latest month on record.
pub struct ForecastIndicator<'a> {
    pub status: &'a ForecastStatus,
    /// Total of the most recent month in the ledger, if any.
    pub last_total: Option<f64>,
    pub currency: &'a str,
    pub theme: &'a Theme,
}

impl<'a> ForecastIndicator<'a> {
    pub fn new(
        status: &'a ForecastStatus,
        last_total: Option<f64>,
        currency: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            status,
            last_total,
            currency,
            theme,
        }
    }

    /// Change from the latest month to the prediction, in percent.
    pub fn change_pct(&self) -> Option<f64> {
        let amount = self.status.amount()?;
        let last = self.last_total.filter(|t| *t != 0.0)?;
        Some(percentage(amount - last, last, 1))
    }

    /// Render the indicator.
    ///
    /// Format: `"Predicted spending for 2024-03 (month 3): ₹300.00  (+50.0%)"`
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        match self.status {
            ForecastStatus::ModelMissing => vec![
                Line::from(Span::styled("No trained model found.", self.theme.warning)),
                Line::from(Span::styled(TRAIN_FIRST_HINT, self.theme.info)),
            ],
            ForecastStatus::ModelUnreadable => vec![
                Line::from(Span::styled(MODEL_UNREADABLE, self.theme.error)),
                Line::from(Span::styled(TRAIN_FIRST_HINT, self.theme.info)),
            ],
            ForecastStatus::NoData => vec![Line::from(Span::styled(
                "Add some expenses to see a prediction.",
                self.theme.dim,
            ))],
            ForecastStatus::Predicted {
                next_index,
                next_month,
                amount,
            } => {
                let mut spans = vec![
                    Span::styled(
                        format!("Predicted spending for {next_month} (month {next_index}): "),
                        self.theme.label,
                    ),
                    Span::styled(format_currency(*amount, self.currency), self.theme.value),
                ];
                if let Some(change) = self.change_pct() {
                    let sign = if change > 0.0 { "+" } else { "" };
                    spans.push(Span::styled(
                        format!("  ({sign}{})", format_percentage(change)),
                        self.theme.trend_style(change),
                    ));
                }
                let mut lines = vec![Line::from(spans)];
                if *amount < 0.0 {
                    lines.push(Line::from(Span::styled(
                        "The trend is falling steeply; treat a negative prediction as zero.",
                        self.theme.dim,
                    )));
                }
                lines
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
