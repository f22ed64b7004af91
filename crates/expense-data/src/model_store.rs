//! Persistence for the fitted [`TrendModel`].
//!
//! The file is a JSON object holding exactly `slope` and `intercept`. Its
//! presence is the only state the forecaster has: absent means "train
//! first", present means a prediction can be shown.

use std::path::{Path, PathBuf};

use expense_core::error::{ExpenseError, Result};
use expense_core::forecast::TrendModel;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `model`, replacing any previous one.
    pub fn save(&self, model: &TrendModel) -> Result<()> {
        let write_err = |source: std::io::Error| ExpenseError::FileWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(model)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_err)?;
        std::fs::rename(&tmp, &self.path).map_err(write_err)?;

        info!(
            slope = model.slope,
            intercept = model.intercept,
            "Saved trend model to {}",
            self.path.display()
        );
        Ok(())
    }

    /// Load the model, or `None` when no model has been trained yet.
    pub fn load(&self) -> Result<Option<TrendModel>> {
        if !self.exists() {
            debug!("No trend model at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            ExpenseError::FileRead {
                path: self.path.clone(),
                source,
            }
        })?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}
