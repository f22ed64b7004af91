use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Expense Tracker.
#[derive(Error, Debug)]
pub enum ExpenseError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be created, written or renamed into place.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ledger row could not be read or written as CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date string did not match any recognised format.
    #[error("Invalid date: {0}")]
    DateParse(String),

    /// An amount string could not be coerced to a number.
    #[error("Invalid amount: {0}")]
    AmountParse(String),

    /// A category name is not one of the fixed categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The ledger file required by the operation does not exist.
    #[error("Ledger file not found: {0}")]
    LedgerNotFound(PathBuf),

    /// A trend fit was requested with no monthly data.
    #[error("Not enough data to fit a trend: {0}")]
    InsufficientData(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the expense crates.
pub type Result<T> = std::result::Result<T, ExpenseError>;
