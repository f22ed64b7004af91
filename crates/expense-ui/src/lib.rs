//! Terminal UI layer for the expense tracker.
//!
//! Provides themes, the header and metric components, the history and
//! monthly tables, the trend and category charts, the plain-text report and
//! the dashboard event loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod report;
pub mod table_view;
pub mod themes;

pub use expense_core as core;
