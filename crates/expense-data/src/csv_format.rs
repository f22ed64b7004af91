//! Ledger CSV layout: `Date,Category,Description,Amount`, header row first.

use std::io::{Read, Write};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use expense_core::error::Result;
use expense_core::models::{parse_amount, parse_date, ExpenseRecord, DATE_FORMAT};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column names, in file order.
pub const HEADERS: [&str; 4] = ["Date", "Category", "Description", "Amount"];

#[derive(Deserialize)]
struct LedgerRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Amount")]
    amount: String,
}

#[derive(Serialize)]
struct LedgerOutRow<'a> {
    date: String,
    category: &'a str,
    description: &'a str,
    amount: String,
}

/// Parse every row of a ledger CSV into records, in file order.
///
/// Columns are matched by header name. Values are coerced to their types;
/// the first row that fails coercion aborts the read.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize::<LedgerRow>() {
        let row = row?;
        records.push(ExpenseRecord {
            date: parse_date(&row.date)?,
            category: row.category.parse()?,
            description: row.description,
            amount: parse_amount(&row.amount)?,
        });
    }

    debug!("Parsed {} ledger rows", records.len());
    Ok(records)
}

/// Write the header row followed by one row per record.
///
/// The header is written even when `records` is empty.
pub fn write_records<W: Write>(writer: W, records: &[ExpenseRecord]) -> Result<()> {
    let mut wrt = WriterBuilder::new().has_headers(false).from_writer(writer);
    wrt.write_record(HEADERS)?;

    for r in records {
        wrt.serialize(LedgerOutRow {
            date: r.date.format(DATE_FORMAT).to_string(),
            category: r.category.as_str(),
            description: &r.description,
            amount: r.amount.to_string(),
        })?;
    }
    wrt.flush()?;
    Ok(())
}
