use clap::{CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::formatting::DEFAULT_CURRENCY;
use crate::models::{self, Category};

/// Default ledger location, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";

/// Default trend model location, relative to the working directory.
pub const DEFAULT_MODEL_FILE: &str = "expense_predictor.json";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Personal expense tracker with a monthly spending forecast
#[derive(Parser, Debug, Clone)]
#[command(
    name = "expense-tracker",
    about = "Personal expense tracker with a monthly spending forecast",
    version
)]
pub struct Settings {
    /// Ledger CSV file
    #[arg(long, global = true, default_value = DEFAULT_LEDGER_FILE)]
    pub ledger_file: PathBuf,

    /// Trained trend model file
    #[arg(long, global = true, default_value = DEFAULT_MODEL_FILE)]
    pub model_file: PathBuf,

    /// Currency symbol shown in front of amounts
    #[arg(long, global = true, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Display theme
    #[arg(long, global = true, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.expense-tracker/logs/expense-tracker.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long, global = true)]
    pub clear: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to do once settings are resolved.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Record a new expense
    Add(AddArgs),
    /// Append every expense from another ledger-format CSV file
    Import {
        /// CSV file with Date,Category,Description,Amount columns
        path: PathBuf,
    },
    /// Open the interactive dashboard (default)
    Show,
    /// Print a plain-text summary to stdout
    Report,
    /// Fit the monthly trend model and save it
    Train,
    /// Print next month's predicted spend
    Predict,
}

/// Fields of a new expense.
#[derive(clap::Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    /// Date of the expense (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = models::parse_date)]
    pub date: Option<chrono::NaiveDate>,

    /// One of: Food, Transport, Shopping, Bills, Entertainment, Other
    #[arg(long, value_parser = parse_category)]
    pub category: Category,

    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Amount spent (non-negative)
    #[arg(long, value_parser = parse_non_negative_amount)]
    pub amount: f64,
}

fn parse_category(s: &str) -> Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

fn parse_non_negative_amount(s: &str) -> Result<f64, String> {
    let value = models::parse_amount(s).map_err(|e| e.to_string())?;
    if value < 0.0 {
        return Err(format!("amount must not be negative: {s}"));
    }
    Ok(value)
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.expense-tracker/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_file: Option<PathBuf>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".expense-tracker").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable last-used params");
            Self::default()
        })
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit CLI
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with an explicit argument
    /// list and config path.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "could not clear last-used params");
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "currency") {
            if let Some(v) = last.currency {
                settings.currency = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "ledger_file") {
            if let Some(v) = last.ledger_file {
                settings.ledger_file = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "model_file") {
            if let Some(v) = last.model_file {
                settings.model_file = v;
            }
        }

        settings = Self::apply_debug(settings);

        if let Err(e) = LastUsedParams::from(&settings).save_to(config_path) {
            tracing::warn!(error = %e, "could not persist last-used params");
        }

        settings
    }

    /// The subcommand to run; no subcommand means the dashboard.
    pub fn action(&self) -> Command {
        self.command.clone().unwrap_or(Command::Show)
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            currency: Some(s.currency.clone()),
            ledger_file: Some(s.ledger_file.clone()),
            model_file: Some(s.model_file.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            currency: Some("€".to_string()),
            ledger_file: Some(PathBuf::from("/data/expenses.csv")),
            model_file: Some(PathBuf::from("/data/model.json")),
        };

        params.save_to(&path).expect("save");
        assert_eq!(LastUsedParams::load_from(&path), params);
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert_eq!(loaded, LastUsedParams::default());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(LastUsedParams::load_from(&path), LastUsedParams::default());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── CLI parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["expense-tracker"]);

        assert_eq!(settings.ledger_file, PathBuf::from("expenses.csv"));
        assert_eq!(settings.model_file, PathBuf::from("expense_predictor.json"));
        assert_eq!(settings.currency, "₹");
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
        assert!(!settings.clear);
        assert_eq!(settings.action(), Command::Show);
    }

    #[test]
    fn test_settings_add_command() {
        let settings = Settings::parse_from([
            "expense-tracker",
            "add",
            "--date",
            "2024-03-09",
            "--category",
            "food",
            "--description",
            "Groceries",
            "--amount",
            "42.75",
        ]);

        let Command::Add(args) = settings.action() else {
            panic!("expected add command");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2024, 3, 9));
        assert_eq!(args.category, Category::Food);
        assert_eq!(args.description, "Groceries");
        assert_eq!(args.amount, 42.75);
    }

    #[test]
    fn test_settings_add_defaults_date_and_description() {
        let settings = Settings::parse_from([
            "expense-tracker",
            "add",
            "--category",
            "Bills",
            "--amount",
            "10",
        ]);
        let Command::Add(args) = settings.action() else {
            panic!("expected add command");
        };
        assert!(args.date.is_none());
        assert_eq!(args.description, "");
    }

    #[test]
    fn test_settings_add_rejects_negative_amount() {
        let result = Settings::try_parse_from([
            "expense-tracker",
            "add",
            "--category",
            "Food",
            "--amount=-5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_add_rejects_unknown_category() {
        let result = Settings::try_parse_from([
            "expense-tracker",
            "add",
            "--category",
            "Travel",
            "--amount",
            "5",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_global_flag_after_subcommand() {
        let settings =
            Settings::parse_from(["expense-tracker", "train", "--ledger-file", "/tmp/x.csv"]);
        assert_eq!(settings.action(), Command::Train);
        assert_eq!(settings.ledger_file, PathBuf::from("/tmp/x.csv"));
    }

    #[test]
    fn test_settings_import_command() {
        let settings = Settings::parse_from(["expense-tracker", "import", "old.csv"]);
        assert_eq!(
            settings.action(),
            Command::Import {
                path: PathBuf::from("old.csv")
            }
        );
    }

    // ── load_with_last_used ──────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            currency: Some("$".to_string()),
            ledger_file: Some(PathBuf::from("/data/ledger.csv")),
            model_file: None,
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["expense-tracker".into()], &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.currency, "$");
        assert_eq!(settings.ledger_file, PathBuf::from("/data/ledger.csv"));
        assert_eq!(settings.model_file, PathBuf::from(DEFAULT_MODEL_FILE));
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-tracker".into(), "--theme".into(), "light".into()],
            &config_path,
        );
        assert_eq!(settings.theme, "light");
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("classic".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-tracker".into(), "--clear".into()],
            &config_path,
        );

        assert!(!config_path.exists(), "file must be gone after --clear");
        assert_eq!(settings.theme, "auto");
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        let settings = Settings::load_with_last_used_impl(
            vec!["expense-tracker".into(), "--debug".into()],
            &config_path,
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);

        Settings::load_with_last_used_impl(
            vec!["expense-tracker".into(), "--currency".into(), "€".into()],
            &config_path,
        );

        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.currency, Some("€".to_string()));
        assert_eq!(loaded.ledger_file, Some(PathBuf::from(DEFAULT_LEDGER_FILE)));
    }
}
