//! Monthly trend line chart and category breakdown bar chart.
//!
//! Series are built first as plain data ([`TrendSeries`], [`CategorySlice`])
//! so they can be checked without a terminal, then handed to ratatui's
//! [`Chart`] and [`BarChart`] widgets.

use ratatui::{
    layout::{Direction, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use expense_core::formatting::{format_currency, format_number, format_percentage};
use expense_core::models::{Category, CategoryAggregate, MonthlyAggregate};
use expense_data::analysis::ForecastStatus;

use crate::themes::Theme;

// ── Trend ─────────────────────────────────────────────────────────────────────

/// Plot data for the monthly trend: x is the 1-based month index.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub actual: Vec<(f64, f64)>,
    /// Last actual point joined to the predicted one, when there is a prediction.
    pub forecast: Vec<(f64, f64)>,
    /// `YYYY-MM` label for every x position, forecast month included.
    pub labels: Vec<String>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl TrendSeries {
    pub fn build(monthly: &[MonthlyAggregate], forecast: &ForecastStatus) -> Self {
        let actual: Vec<(f64, f64)> = monthly
            .iter()
            .enumerate()
            .map(|(i, m)| ((i + 1) as f64, m.total))
            .collect();
        let mut labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();

        let forecast_points = match (forecast, actual.last()) {
            (
                ForecastStatus::Predicted {
                    next_index,
                    next_month,
                    amount,
                },
                Some(last),
            ) => {
                labels.push(next_month.to_string());
                vec![*last, (*next_index as f64, *amount)]
            }
            _ => Vec::new(),
        };

        let all_y = actual.iter().chain(forecast_points.iter()).map(|p| p.1);
        let y_max = all_y.clone().fold(0.0_f64, f64::max);
        let y_min = all_y.fold(0.0_f64, f64::min);
        let headroom = ((y_max - y_min) * 0.1).max(1.0);

        Self {
            x_bounds: [1.0, labels.len().max(2) as f64],
            y_bounds: [y_min, y_max + headroom],
            actual,
            forecast: forecast_points,
            labels,
        }
    }
}

/// Render the monthly totals as a line, with the forecast as a second line
/// segment in its own style.
pub fn render_trend_chart(
    frame: &mut Frame,
    area: Rect,
    series: &TrendSeries,
    currency: &str,
    theme: &Theme,
) {
    let mut datasets = vec![Dataset::default()
        .name("Monthly total")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(&series.actual)];
    if !series.forecast.is_empty() {
        datasets.push(
            Dataset::default()
                .name("Forecast")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(theme.chart_forecast)
                .data(&series.forecast),
        );
    }

    let x_labels: Vec<Span> = match (series.labels.first(), series.labels.last()) {
        (Some(first), Some(last)) if series.labels.len() > 1 => vec![
            Span::styled(first.clone(), theme.chart_axis),
            Span::styled(last.clone(), theme.chart_axis),
        ],
        (Some(only), _) => vec![Span::styled(only.clone(), theme.chart_axis)],
        _ => Vec::new(),
    };
    let [y_lo, y_hi] = series.y_bounds;
    let y_labels = vec![
        Span::styled(format_number(y_lo, 0), theme.chart_axis),
        Span::styled(format_number((y_lo + y_hi) / 2.0, 0), theme.chart_axis),
        Span::styled(format_number(y_hi, 0), theme.chart_axis),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Monthly Trend ({currency}) ")),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds(series.x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds(series.y_bounds)
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ── Categories ────────────────────────────────────────────────────────────────

/// One bar of the category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySlice {
    pub category: Category,
    pub total: f64,
    /// Percent of the grand total, one decimal.
    pub share: f64,
}

/// Turn category aggregates into bars, largest first.
pub fn category_slices(categories: &[CategoryAggregate], grand_total: f64) -> Vec<CategorySlice> {
    let mut slices: Vec<CategorySlice> = categories
        .iter()
        .map(|c| CategorySlice {
            category: c.category,
            total: c.total,
            share: c.share_of(grand_total),
        })
        .collect();
    slices.sort_by(|a, b| b.total.total_cmp(&a.total));
    slices
}

/// Render a horizontal bar per category labelled with its amount and share.
pub fn render_category_chart(
    frame: &mut Frame,
    area: Rect,
    slices: &[CategorySlice],
    currency: &str,
    theme: &Theme,
) {
    let bars: Vec<Bar> = slices
        .iter()
        .map(|s| {
            let style: Style = theme.category_style(s.category);
            Bar::default()
                .value(s.total.max(0.0).round() as u64)
                .label(Line::from(s.category.as_str()))
                .text_value(format!(
                    "{} ({})",
                    format_currency(s.total, currency),
                    format_percentage(s.share)
                ))
                .style(style)
                .value_style(style.add_modifier(Modifier::REVERSED))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Spending by Category "),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
