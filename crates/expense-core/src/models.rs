use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExpenseError, Result};

/// Date format used when writing dates to the ledger file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed set of spending categories offered when adding an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Entertainment,
    Other,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Entertainment,
        Category::Other,
    ];

    /// Display name, also used as the on-disk representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ExpenseError;

    /// Case-insensitive match against the category names.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ExpenseError::UnknownCategory(trimmed.to_string()))
    }
}

/// A single expense entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Calendar date the money was spent.
    pub date: NaiveDate,
    /// Spending category.
    pub category: Category,
    /// Free-text note; may be empty.
    pub description: String,
    /// Amount spent.
    pub amount: f64,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        category: Category,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            date,
            category,
            description: description.into(),
            amount,
        }
    }

    /// Calendar month this record falls in.
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month number (1 = January).
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for MonthKey {
    /// Formats as `YYYY-MM`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Sum of all record amounts within one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub month: MonthKey,
    pub total: f64,
    /// Number of records that contributed to `total`.
    pub count: u32,
}

/// Sum of all record amounts within one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryAggregate {
    pub category: Category,
    pub total: f64,
    pub count: u32,
}

impl CategoryAggregate {
    /// Share of `grand_total` taken by this category, in percent.
    pub fn share_of(&self, grand_total: f64) -> f64 {
        crate::formatting::percentage(self.total, grand_total, 1)
    }
}

// ── Coercion ──────────────────────────────────────────────────────────────────

/// Coerce a date string into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps; the
/// time-of-day part is discarded.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(ExpenseError::DateParse(s.to_string()))
}

/// Coerce an amount string into a finite number.
pub fn parse_amount(s: &str) -> Result<f64> {
    let s = s.trim();
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ExpenseError::AmountParse(s.to_string())),
    }
}
