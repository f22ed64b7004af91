//! Snapshot pipeline for the presentation layer.
//!
//! Loads the ledger and the trained model (if any) and produces a
//! [`LedgerAnalysis`] holding everything the dashboard and the text report
//! show: history, totals, monthly and category breakdowns, and the forecast.

use expense_core::error::Result;
use expense_core::forecast::TrendModel;
use expense_core::models::{CategoryAggregate, ExpenseRecord, MonthKey, MonthlyAggregate};
use tracing::{debug, warn};

use crate::aggregator::{ExpenseAggregator, LedgerTotals};
use crate::ledger::LedgerStore;
use crate::model_store::ModelStore;

// ── Public types ──────────────────────────────────────────────────────────────

/// Whether a next-month prediction can be shown.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastStatus {
    /// No model file exists; the user should run the training step.
    ModelMissing,
    /// A model file exists but could not be read; retraining replaces it.
    ModelUnreadable,
    /// A model exists but the ledger has no records to index from.
    NoData,
    /// Prediction for the month after the last one in the ledger.
    Predicted {
        /// 1-based month index that was predicted.
        next_index: usize,
        /// Calendar month following the last month present.
        next_month: MonthKey,
        /// Predicted total; may be negative for a falling trend.
        amount: f64,
    },
}

impl ForecastStatus {
    /// Predicted amount, if there is one.
    pub fn amount(&self) -> Option<f64> {
        match self {
            ForecastStatus::Predicted { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

/// The complete output of [`analyze_ledger`].
#[derive(Debug, Clone)]
pub struct LedgerAnalysis {
    /// All records, newest first; records sharing a date keep ledger order.
    pub history: Vec<ExpenseRecord>,
    /// Sum of every amount.
    pub total_spent: f64,
    /// Per-month totals, oldest first.
    pub monthly: Vec<MonthlyAggregate>,
    /// Totals over `monthly`.
    pub totals: LedgerTotals,
    /// Per-category totals in fixed category order.
    pub categories: Vec<CategoryAggregate>,
    pub forecast: ForecastStatus,
}

impl LedgerAnalysis {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Build the snapshot from in-memory records and an optional model.
///
/// The prediction indexes from the number of months in this ledger's own
/// aggregation, not from whatever the model was trained on.
pub fn analyze_ledger(records: Vec<ExpenseRecord>, model: Option<TrendModel>) -> LedgerAnalysis {
    let monthly = ExpenseAggregator::aggregate_by_month(&records);
    let categories = ExpenseAggregator::aggregate_by_category(&records);
    let totals = ExpenseAggregator::calculate_totals(&monthly);
    let total_spent = ExpenseAggregator::total_spent(&records);

    let forecast = match (model, monthly.last()) {
        (None, _) => ForecastStatus::ModelMissing,
        (Some(_), None) => ForecastStatus::NoData,
        (Some(model), Some(last)) => ForecastStatus::Predicted {
            next_index: monthly.len() + 1,
            next_month: last.month.succ(),
            amount: model.predict_next(monthly.len()),
        },
    };

    let mut history = records;
    history.sort_by(|a, b| b.date.cmp(&a.date));

    debug!(
        records = history.len(),
        months = monthly.len(),
        "ledger analysis built"
    );

    LedgerAnalysis {
        history,
        total_spent,
        monthly,
        totals,
        categories,
        forecast,
    }
}

/// Load everything from storage and build the snapshot.
///
/// Only ledger errors fail the load. An unreadable model file degrades the
/// forecast to [`ForecastStatus::ModelUnreadable`] and leaves the rest of the
/// snapshot intact.
pub fn load_analysis(ledger: &impl LedgerStore, models: &ModelStore) -> Result<LedgerAnalysis> {
    let records = ledger.load_all()?;
    match models.load() {
        Ok(model) => Ok(analyze_ledger(records, model)),
        Err(e) => {
            warn!(
                path = %models.path().display(),
                error = %e,
                "ignoring unreadable trend model"
            );
            let mut analysis = analyze_ledger(records, None);
            analysis.forecast = ForecastStatus::ModelUnreadable;
            Ok(analysis)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CsvLedger, MemoryLedger};
    use chrono::NaiveDate;
    use expense_core::models::Category;
    use tempfile::TempDir;

    fn make_record(date: &str, desc: &str, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            Category::Food,
            desc,
            amount,
        )
    }

    #[test]
    fn test_analyze_empty_without_model() {
        let analysis = analyze_ledger(vec![], None);
        assert!(analysis.is_empty());
        assert!(analysis.monthly.is_empty());
        assert_eq!(analysis.total_spent, 0.0);
        assert_eq!(analysis.forecast, ForecastStatus::ModelMissing);
    }

    #[test]
    fn test_analyze_empty_with_model_is_no_data() {
        let analysis = analyze_ledger(vec![], Some(TrendModel::new(1.0, 1.0)));
        assert_eq!(analysis.forecast, ForecastStatus::NoData);
        assert_eq!(analysis.forecast.amount(), None);
    }

    #[test]
    fn test_history_newest_first_stable() {
        let records = vec![
            make_record("2024-01-10", "a", 1.0),
            make_record("2024-03-01", "b", 2.0),
            make_record("2024-01-10", "c", 3.0),
            make_record("2024-02-15", "d", 4.0),
        ];
        let analysis = analyze_ledger(records, None);

        let order: Vec<&str> = analysis.history.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_prediction_uses_ledger_month_count() {
        let records = vec![
            make_record("2024-01-05", "", 100.0),
            make_record("2024-02-05", "", 200.0),
        ];
        let analysis = analyze_ledger(records, Some(TrendModel::new(100.0, 0.0)));

        assert_eq!(
            analysis.forecast,
            ForecastStatus::Predicted {
                next_index: 3,
                next_month: MonthKey::new(2024, 3),
                amount: 300.0,
            }
        );
        assert_eq!(analysis.total_spent, 300.0);
        assert_eq!(analysis.totals.months, 2);
    }

    #[test]
    fn test_prediction_next_month_wraps_year() {
        let records = vec![make_record("2024-12-24", "gifts", 80.0)];
        let analysis = analyze_ledger(records, Some(TrendModel::new(0.0, 80.0)));
        match analysis.forecast {
            ForecastStatus::Predicted { next_month, amount, .. } => {
                assert_eq!(next_month, MonthKey::new(2025, 1));
                assert_eq!(amount, 80.0);
            }
            other => panic!("unexpected forecast {other:?}"),
        }
    }

    #[test]
    fn test_load_analysis_from_memory_ledger() {
        let tmp = TempDir::new().expect("tempdir");
        let ledger = MemoryLedger::from(vec![make_record("2024-05-01", "x", 9.0)]);
        let models = ModelStore::new(tmp.path().join("absent.json"));

        let analysis = load_analysis(&ledger, &models).unwrap();

        assert_eq!(analysis.history.len(), 1);
        assert_eq!(analysis.forecast, ForecastStatus::ModelMissing);
    }

    #[test]
    fn test_load_analysis_with_saved_model() {
        let tmp = TempDir::new().expect("tempdir");
        let mut ledger = CsvLedger::new(tmp.path().join("expenses.csv"));
        ledger.append(make_record("2024-05-01", "x", 50.0)).unwrap();
        let models = ModelStore::new(tmp.path().join("model.json"));
        models.save(&TrendModel::new(0.0, 50.0)).unwrap();

        let analysis = load_analysis(&ledger, &models).unwrap();

        assert_eq!(analysis.forecast.amount(), Some(50.0));
    }

    #[test]
    fn test_load_analysis_unreadable_model_keeps_history() {
        let tmp = TempDir::new().expect("tempdir");
        let model_path = tmp.path().join("model.json");
        std::fs::write(&model_path, r#"{"slope": 1.0}"#).unwrap();
        let ledger = MemoryLedger::from(vec![make_record("2024-05-01", "x", 9.0)]);

        let analysis = load_analysis(&ledger, &ModelStore::new(&model_path)).unwrap();

        assert_eq!(analysis.history.len(), 1);
        assert_eq!(analysis.total_spent, 9.0);
        assert_eq!(analysis.forecast, ForecastStatus::ModelUnreadable);
        assert_eq!(analysis.forecast.amount(), None);
    }

    #[test]
    fn test_load_analysis_ledger_error_still_fails() {
        let tmp = TempDir::new().expect("tempdir");
        let ledger_path = tmp.path().join("expenses.csv");
        std::fs::write(&ledger_path, "Date,Category,Description,Amount
not-a-date,Food,,1
")
            .unwrap();
        let ledger = CsvLedger::new(&ledger_path);

        assert!(load_analysis(&ledger, &ModelStore::new(tmp.path().join("m.json"))).is_err());
    }
}
