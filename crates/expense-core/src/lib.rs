//! Core domain library for the Expense Tracker.
//!
//! Holds the expense data model, the shared error type, the least-squares
//! trend forecaster, number formatting helpers, and the CLI settings layer
//! used by the `expense-tracker` binary.

pub mod error;
pub mod forecast;
pub mod formatting;
pub mod models;
pub mod settings;
