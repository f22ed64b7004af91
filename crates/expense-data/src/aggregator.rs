//! Expense aggregation by calendar month and by category.

use std::collections::BTreeMap;

use expense_core::models::{CategoryAggregate, ExpenseRecord, MonthlyAggregate};

// ── Totals ────────────────────────────────────────────────────────────────────

/// Cross-period totals shown under the monthly summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerTotals {
    /// Sum of every amount.
    pub total: f64,
    /// Number of records.
    pub count: u32,
    /// Number of distinct months.
    pub months: u32,
}

impl LedgerTotals {
    /// Mean spend per month that has at least one record.
    pub fn average_per_month(&self) -> f64 {
        if self.months == 0 {
            0.0
        } else {
            self.total / self.months as f64
        }
    }
}

// ── ExpenseAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups expense records.
pub struct ExpenseAggregator;

impl ExpenseAggregator {
    /// Sum amounts per calendar month.
    ///
    /// Returns one aggregate per month that has records, sorted ascending.
    /// Months without records are absent rather than zero.
    pub fn aggregate_by_month(records: &[ExpenseRecord]) -> Vec<MonthlyAggregate> {
        Self::aggregate_by(records, ExpenseRecord::month_key)
            .into_iter()
            .map(|(month, (total, count))| MonthlyAggregate {
                month,
                total,
                count,
            })
            .collect()
    }

    /// Sum amounts per category, in the fixed category order.
    ///
    /// Categories without records are omitted.
    pub fn aggregate_by_category(records: &[ExpenseRecord]) -> Vec<CategoryAggregate> {
        Self::aggregate_by(records, |r| r.category)
            .into_iter()
            .map(|(category, (total, count))| CategoryAggregate {
                category,
                total,
                count,
            })
            .collect()
    }

    /// Sum of every amount in `records`.
    pub fn total_spent(records: &[ExpenseRecord]) -> f64 {
        records.iter().map(|r| r.amount).sum()
    }

    /// Sum up the monthly aggregates into a single [`LedgerTotals`].
    pub fn calculate_totals(monthly: &[MonthlyAggregate]) -> LedgerTotals {
        monthly.iter().fold(LedgerTotals::default(), |mut acc, m| {
            acc.total += m.total;
            acc.count += m.count;
            acc.months += 1;
            acc
        })
    }

    /// Generic grouping driver; `BTreeMap` keeps keys sorted.
    fn aggregate_by<K: Ord>(
        records: &[ExpenseRecord],
        key_fn: impl Fn(&ExpenseRecord) -> K,
    ) -> BTreeMap<K, (f64, u32)> {
        let mut map: BTreeMap<K, (f64, u32)> = BTreeMap::new();
        for record in records {
            let slot = map.entry(key_fn(record)).or_insert((0.0, 0));
            slot.0 += record.amount;
            slot.1 += 1;
        }
        map
    }
}

/// Standalone monthly aggregation (same as
/// [`ExpenseAggregator::aggregate_by_month`]).
pub fn aggregate_by_month(records: &[ExpenseRecord]) -> Vec<MonthlyAggregate> {
    ExpenseAggregator::aggregate_by_month(records)
}
