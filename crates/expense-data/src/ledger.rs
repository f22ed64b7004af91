//! Ledger storage behind a small append/scan contract.
//!
//! [`LedgerStore`] is the only interface callers see. [`CsvLedger`] persists
//! by rewriting the whole CSV file on every write; [`MemoryLedger`] keeps the
//! records in a `Vec` and never touches disk.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use expense_core::error::{ExpenseError, Result};
use expense_core::models::ExpenseRecord;
use tracing::{debug, info};

use crate::csv_format::{read_records, write_records};

// ── LedgerStore ───────────────────────────────────────────────────────────────

/// Ordered, append-only collection of expense records.
pub trait LedgerStore {
    /// Add `record` after every existing record.
    ///
    /// File-backed stores re-read the existing rows first, so a malformed row
    /// already on disk makes every later append fail until it is fixed.
    fn append(&mut self, record: ExpenseRecord) -> Result<()>;

    /// Every stored record, in insertion order.
    fn load_all(&self) -> Result<Vec<ExpenseRecord>>;

    /// Append several records, preserving their order. Returns how many were
    /// added.
    fn extend(&mut self, records: Vec<ExpenseRecord>) -> Result<usize> {
        let count = records.len();
        for record in records {
            self.append(record)?;
        }
        Ok(count)
    }
}

// ── CsvLedger ─────────────────────────────────────────────────────────────────

/// File-backed ledger that rewrites the full CSV on every write.
///
/// Not safe for concurrent writers: two processes appending at once can lose
/// an update.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been created yet.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Replace the file contents with `records`.
    ///
    /// Writes a sibling temp file first and renames it over the ledger.
    fn write_all(&self, records: &[ExpenseRecord]) -> Result<()> {
        let write_err = |source: std::io::Error| ExpenseError::FileWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = self.path.with_extension("csv.tmp");
        let file = File::create(&tmp).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        write_records(&mut writer, records)?;
        writer.flush().map_err(write_err)?;
        drop(writer);

        std::fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl LedgerStore for CsvLedger {
    fn append(&mut self, record: ExpenseRecord) -> Result<()> {
        self.extend(vec![record]).map(|_| ())
    }

    fn load_all(&self) -> Result<Vec<ExpenseRecord>> {
        if !self.exists() {
            debug!("Ledger {} does not exist yet", self.path.display());
            return Ok(Vec::new());
        }
        read_ledger_file(&self.path)
    }

    /// Single rewrite for the whole batch; an empty batch touches nothing.
    fn extend(&mut self, records: Vec<ExpenseRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut all = self.load_all()?;
        let added = records.len();
        all.extend(records);
        self.write_all(&all)?;
        info!(
            added,
            total = all.len(),
            "Saved ledger {}",
            self.path.display()
        );
        Ok(added)
    }
}

/// Read a ledger-format CSV that must already exist.
pub fn read_ledger_file(path: &Path) -> Result<Vec<ExpenseRecord>> {
    let file = File::open(path).map_err(|source| ExpenseError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_records(BufReader::new(file))
}

// ── MemoryLedger ──────────────────────────────────────────────────────────────

/// In-memory ledger with the same contract as [`CsvLedger`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    records: Vec<ExpenseRecord>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<ExpenseRecord>> for MemoryLedger {
    fn from(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }
}

impl LedgerStore for MemoryLedger {
    fn append(&mut self, record: ExpenseRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ExpenseRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use expense_core::models::Category;
    use tempfile::TempDir;

    fn make_record(day: u32, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            Category::Food,
            format!("meal {day}"),
            amount,
        )
    }

    // ── CsvLedger ─────────────────────────────────────────────────────────────

    #[test]
    fn test_load_all_missing_file_is_empty() {
        let tmp = TempDir::new().expect("tempdir");
        let ledger = CsvLedger::new(tmp.path().join("expenses.csv"));
        assert!(!ledger.exists());
        assert!(ledger.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let tmp = TempDir::new().expect("tempdir");
        let mut ledger = CsvLedger::new(tmp.path().join("expenses.csv"));

        // Deliberately out of date order.
        let records = vec![make_record(20, 5.0), make_record(3, 7.5), make_record(11, 1.25)];
        for r in &records {
            ledger.append(r.clone()).expect("append");
        }

        assert_eq!(ledger.load_all().unwrap(), records);
    }

    #[test]
    fn test_append_survives_reopen() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("expenses.csv");
        CsvLedger::new(&path).append(make_record(1, 10.0)).unwrap();

        let reopened = CsvLedger::new(&path);
        assert_eq!(reopened.load_all().unwrap(), vec![make_record(1, 10.0)]);
    }

    #[test]
    fn test_append_creates_parent_directories() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("nested").join("dir").join("expenses.csv");
        let mut ledger = CsvLedger::new(&path);
        ledger.append(make_record(2, 3.0)).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_file_has_header_row() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("expenses.csv");
        CsvLedger::new(&path).append(make_record(9, 2.5)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("Date,Category,Description,Amount"));
        assert_eq!(lines.next(), Some("2024-01-09,Food,meal 9,2.5"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("expenses.csv");
        CsvLedger::new(&path).append(make_record(1, 1.0)).unwrap();
        assert!(!tmp.path().join("expenses.csv.tmp").exists());
    }

    #[test]
    fn test_extend_appends_batch_after_existing() {
        let tmp = TempDir::new().expect("tempdir");
        let mut ledger = CsvLedger::new(tmp.path().join("expenses.csv"));
        ledger.append(make_record(1, 1.0)).unwrap();

        let added = ledger
            .extend(vec![make_record(2, 2.0), make_record(3, 3.0)])
            .unwrap();

        assert_eq!(added, 2);
        let amounts: Vec<f64> = ledger.load_all().unwrap().iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_extend_empty_batch_does_not_create_file() {
        let tmp = TempDir::new().expect("tempdir");
        let mut ledger = CsvLedger::new(tmp.path().join("expenses.csv"));

        assert_eq!(ledger.extend(Vec::new()).unwrap(), 0);
        assert!(!ledger.exists());
    }

    #[test]
    fn test_extend_empty_batch_leaves_malformed_file_untouched() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("expenses.csv");
        let content = "Date,Category,Description,Amount\n2024-01-01,Food,x,abc\n";
        std::fs::write(&path, content).unwrap();
        let mut ledger = CsvLedger::new(&path);

        assert_eq!(ledger.extend(Vec::new()).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
        // A real append still has to read the bad row and fails.
        assert!(ledger.append(make_record(2, 2.0)).is_err());
    }

    #[test]
    fn test_read_ledger_file_missing_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = read_ledger_file(&tmp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ExpenseError::FileRead { .. }));
    }

    #[test]
    fn test_load_all_propagates_parse_errors() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("expenses.csv");
        std::fs::write(&path, "Date,Category,Description,Amount\n2024-01-01,Food,x,abc\n").unwrap();
        assert!(CsvLedger::new(&path).load_all().is_err());
    }

    // ── MemoryLedger ──────────────────────────────────────────────────────────

    #[test]
    fn test_memory_ledger_contract() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.is_empty());

        ledger.append(make_record(5, 5.0)).unwrap();
        ledger.extend(vec![make_record(6, 6.0), make_record(4, 4.0)]).unwrap();

        assert_eq!(ledger.len(), 3);
        let amounts: Vec<f64> = ledger.load_all().unwrap().iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![5.0, 6.0, 4.0]);
    }
}
