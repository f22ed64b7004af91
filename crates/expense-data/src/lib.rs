//! Data layer for the Expense Tracker.
//!
//! Reads and writes the CSV ledger, hides the persistence strategy behind the
//! [`ledger::LedgerStore`] trait, aggregates records by month and category,
//! stores the fitted trend model, and assembles the analysis snapshot that
//! the presentation layer renders.

pub mod aggregator;
pub mod analysis;
pub mod csv_format;
pub mod ledger;
pub mod model_store;
pub mod trainer;

pub use expense_core as core;
