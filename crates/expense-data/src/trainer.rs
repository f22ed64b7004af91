//! Batch retraining: ledger file in, model file out.

use std::path::Path;

use expense_core::error::{ExpenseError, Result};
use expense_core::forecast::TrendModel;
use tracing::info;

use crate::aggregator::aggregate_by_month;
use crate::ledger::{CsvLedger, LedgerStore};
use crate::model_store::ModelStore;

/// What a successful retrain produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    pub model: TrendModel,
    /// Number of distinct months the line was fitted over.
    pub months: usize,
    /// Number of ledger records read.
    pub records: usize,
}

/// Read the whole ledger at `ledger_path`, fit the monthly trend, and save
/// it to `model_path`.
///
/// A missing ledger is reported as [`ExpenseError::LedgerNotFound`] and
/// nothing is written. An empty ledger fails the fit with
/// [`ExpenseError::InsufficientData`], also without writing.
pub fn retrain(ledger_path: &Path, model_path: &Path) -> Result<TrainingOutcome> {
    let ledger = CsvLedger::new(ledger_path);
    if !ledger.exists() {
        return Err(ExpenseError::LedgerNotFound(ledger_path.to_path_buf()));
    }

    let records = ledger.load_all()?;
    let monthly = aggregate_by_month(&records);
    let model = TrendModel::fit(&monthly)?;

    ModelStore::new(model_path).save(&model)?;

    info!(
        records = records.len(),
        months = monthly.len(),
        "Trend model trained"
    );

    Ok(TrainingOutcome {
        model,
        months: monthly.len(),
        records: records.len(),
    })
}
