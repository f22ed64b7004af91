use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, Result};
use crate::models::MonthlyAggregate;

// ── Least-squares helper ──────────────────────────────────────────────────────

/// Closed-form ordinary least squares over `(x, y)` pairs.
///
/// Returns `(slope, intercept)`, or `None` for an empty slice.  When every
/// `x` is identical (including the single-point case) the slope is `0.0` and
/// the intercept is the mean of `y`.
pub fn least_squares(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    if sxx == 0.0 {
        return Some((0.0, mean_y));
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

// ── TrendModel ────────────────────────────────────────────────────────────────

/// A fitted line `total = slope * month_index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendModel {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendModel {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Fit a trend over monthly totals.
    ///
    /// `aggregates` must be sorted by month ascending; each one is assigned
    /// the 1-based index of its position, so calendar gaps between months do
    /// not widen the x axis.  A single month yields a flat line through its
    /// total.
    pub fn fit(aggregates: &[MonthlyAggregate]) -> Result<Self> {
        let points: Vec<(f64, f64)> = aggregates
            .iter()
            .enumerate()
            .map(|(i, agg)| ((i + 1) as f64, agg.total))
            .collect();

        let (slope, intercept) = least_squares(&points).ok_or_else(|| {
            ExpenseError::InsufficientData("at least one month of expenses is required".into())
        })?;

        tracing::debug!(
            months = aggregates.len(),
            slope,
            intercept,
            "fitted monthly spending trend"
        );

        Ok(Self { slope, intercept })
    }

    /// Value of the line at `month_index`.
    pub fn predict(&self, month_index: f64) -> f64 {
        self.slope * month_index + self.intercept
    }

    /// Forecast for the month after `last_index`.
    ///
    /// No clamping is applied, so a falling trend can go negative.
    pub fn predict_next(&self, last_index: usize) -> f64 {
        self.predict((last_index + 1) as f64)
    }
}

/// Standalone fit (same as [`TrendModel::fit`]).
pub fn fit(aggregates: &[MonthlyAggregate]) -> Result<TrendModel> {
    TrendModel::fit(aggregates)
}

/// Standalone prediction (same as [`TrendModel::predict_next`]).
pub fn predict_next(model: &TrendModel, last_index: usize) -> f64 {
    model.predict_next(last_index)
}
