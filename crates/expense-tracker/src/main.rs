mod bootstrap;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use expense_core::error::ExpenseError;
use expense_core::formatting::format_currency;
use expense_core::models::ExpenseRecord;
use expense_core::settings::{AddArgs, Command, Settings};
use expense_data::analysis::{load_analysis, ForecastStatus, LedgerAnalysis};
use expense_data::ledger::{read_ledger_file, CsvLedger, LedgerStore};
use expense_data::model_store::ModelStore;
use expense_data::trainer::retrain;
use expense_ui::app::App;
use expense_ui::components::metric::{MODEL_UNREADABLE, TRAIN_FIRST_HINT};
use expense_ui::report::write_report;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .unwrap_or_else(bootstrap::default_log_file);
    bootstrap::setup_logging(&settings.log_level, Some(log_file.as_path()))?;

    tracing::info!("Expense Tracker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        ledger = %settings.ledger_file.display(),
        model = %settings.model_file.display(),
        theme = %settings.theme,
        "settings resolved"
    );

    let mut stdout = io::stdout().lock();

    match settings.action() {
        Command::Add(args) => {
            let today = chrono::Local::now().date_naive();
            add_expense(&settings, &args, today, &mut stdout)?;
        }
        Command::Import { path } => import_expenses(&settings, &path, &mut stdout)?,
        Command::Train => train_model(&settings, &mut stdout)?,
        Command::Predict => {
            let analysis = load(&settings)?;
            print_prediction(&analysis, &settings.currency, &mut stdout)?;
        }
        Command::Report => {
            let analysis = load(&settings)?;
            write_report(&mut stdout, &analysis, &settings.currency)?;
        }
        Command::Show => {
            let analysis = load(&settings)?;
            drop(stdout);
            let app = App::new(
                &settings.theme,
                settings.currency.clone(),
                settings.ledger_file.display().to_string(),
            );
            app.run_dashboard(&analysis)?;
        }
    }

    Ok(())
}

// ── Commands ───────────────────────────────────────────────────────────────────

fn load(settings: &Settings) -> Result<LedgerAnalysis> {
    let ledger = CsvLedger::new(&settings.ledger_file);
    let models = ModelStore::new(&settings.model_file);
    load_analysis(&ledger, &models)
        .with_context(|| format!("cannot load {}", settings.ledger_file.display()))
}

/// Append one record; the date defaults to `today`.
fn add_expense(
    settings: &Settings,
    args: &AddArgs,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<()> {
    let record = ExpenseRecord::new(
        args.date.unwrap_or(today),
        args.category,
        args.description.clone(),
        args.amount,
    );
    CsvLedger::new(&settings.ledger_file).append(record)?;
    writeln!(out, "Expense added successfully!")?;
    Ok(())
}

fn import_expenses(settings: &Settings, source: &Path, out: &mut impl Write) -> Result<()> {
    let records = read_ledger_file(source)?;
    let added = CsvLedger::new(&settings.ledger_file).extend(records)?;
    writeln!(
        out,
        "Imported {added} expenses from {} into {}.",
        source.display(),
        settings.ledger_file.display()
    )?;
    Ok(())
}

fn train_model(settings: &Settings, out: &mut impl Write) -> Result<()> {
    match retrain(&settings.ledger_file, &settings.model_file) {
        Ok(outcome) => {
            writeln!(
                out,
                "Model trained on {} months ({} expenses) and saved to {}.",
                outcome.months,
                outcome.records,
                settings.model_file.display()
            )?;
            Ok(())
        }
        Err(ExpenseError::LedgerNotFound(_)) => {
            writeln!(
                out,
                "No expense data found! Please add some data in the app first."
            )?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_prediction(analysis: &LedgerAnalysis, currency: &str, out: &mut impl Write) -> Result<()> {
    match &analysis.forecast {
        ForecastStatus::Predicted {
            next_month, amount, ..
        } => writeln!(
            out,
            "Predicted spending for next month ({next_month}): {}",
            format_currency(*amount, currency)
        )?,
        ForecastStatus::NoData => writeln!(out, "No expenses added yet.")?,
        ForecastStatus::ModelMissing => writeln!(out, "{TRAIN_FIRST_HINT}")?,
        ForecastStatus::ModelUnreadable => {
            writeln!(out, "{MODEL_UNREADABLE}")?;
            writeln!(out, "{TRAIN_FIRST_HINT}")?;
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use expense_core::models::Category;
    use std::ffi::OsString;
    use tempfile::TempDir;

    fn settings_in(dir: &Path) -> Settings {
        Settings::parse_from([
            OsString::from("expense-tracker"),
            OsString::from("--ledger-file"),
            dir.join("expenses.csv").into_os_string(),
            OsString::from("--model-file"),
            dir.join("expense_predictor.json").into_os_string(),
        ])
    }

    fn add_args(date: &str, category: Category, amount: f64) -> AddArgs {
        AddArgs {
            date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            category,
            description: "test".to_string(),
            amount,
        }
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_expense_appends_and_confirms() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        let mut out = Vec::new();

        add_expense(
            &settings,
            &add_args("2024-01-05", Category::Food, 100.0),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            &mut out,
        )
        .unwrap();

        assert_eq!(output(out), "Expense added successfully!\n");
        let records = CsvLedger::new(&settings.ledger_file).load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 100.0);
    }

    #[test]
    fn test_add_expense_defaults_to_today() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut args = add_args("2024-01-05", Category::Other, 1.0);
        args.date = None;

        add_expense(&settings, &args, today, &mut Vec::new()).unwrap();

        let records = CsvLedger::new(&settings.ledger_file).load_all().unwrap();
        assert_eq!(records[0].date, today);
    }

    #[test]
    fn test_train_without_ledger_prints_message() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        let mut out = Vec::new();

        train_model(&settings, &mut out).unwrap();

        assert!(output(out).contains("No expense data found!"));
        assert!(!settings.model_file.exists());
    }

    #[test]
    fn test_train_then_predict() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for (date, category, amount) in [
            ("2024-01-05", Category::Food, 100.0),
            ("2024-02-05", Category::Bills, 200.0),
        ] {
            add_expense(&settings, &add_args(date, category, amount), today, &mut Vec::new())
                .unwrap();
        }

        let mut out = Vec::new();
        train_model(&settings, &mut out).unwrap();
        assert!(output(out).starts_with("Model trained on 2 months (2 expenses)"));

        let mut out = Vec::new();
        print_prediction(&load(&settings).unwrap(), "₹", &mut out).unwrap();
        assert_eq!(
            output(out),
            "Predicted spending for next month (2024-03): ₹300.00\n"
        );
    }

    #[test]
    fn test_predict_without_model_prints_hint() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        let mut out = Vec::new();

        print_prediction(&load(&settings).unwrap(), "₹", &mut out).unwrap();

        assert_eq!(output(out), format!("{TRAIN_FIRST_HINT}\n"));
    }

    #[test]
    fn test_predict_with_corrupt_model_prints_hint() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        std::fs::write(&settings.model_file, "{ truncated").unwrap();
        let mut out = Vec::new();

        print_prediction(&load(&settings).unwrap(), "₹", &mut out).unwrap();

        assert_eq!(
            output(out),
            format!("{MODEL_UNREADABLE}\n{TRAIN_FIRST_HINT}\n")
        );
    }

    #[test]
    fn test_import_appends_all_rows() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        let source = tmp.path().join("bank.csv");
        std::fs::write(
            &source,
            "Date,Category,Description,Amount\n2024-03-01,Transport,Bus,20\n2024-03-02,Food,Tea,5.5\n",
        )
        .unwrap();
        let mut out = Vec::new();

        import_expenses(&settings, &source, &mut out).unwrap();

        assert!(output(out).starts_with("Imported 2 expenses"));
        let records = CsvLedger::new(&settings.ledger_file).load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].description, "Tea");
    }

    #[test]
    fn test_import_missing_source_is_error() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = settings_in(tmp.path());
        assert!(import_expenses(&settings, &tmp.path().join("nope.csv"), &mut Vec::new()).is_err());
        assert!(!settings.ledger_file.exists());
    }
}
