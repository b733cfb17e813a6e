//! Shared command setup

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendsight_core::import::{categorize_rows, parse_csv};
use spendsight_core::{Categorizer, Config, TransactionRecord};

/// Configuration and resolved paths shared by every command
pub struct AppContext {
    pub config: Config,
    /// Artifact location; `None` only when no data directory exists
    pub model_path: Option<PathBuf>,
}

impl AppContext {
    /// Load config and resolve the artifact path (`--model` wins over config)
    pub fn load(config_path: Option<&Path>, model: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(config_path).context("Failed to load configuration")?;
        Ok(Self::new(config, model))
    }

    pub fn new(config: Config, model: Option<PathBuf>) -> Self {
        let model_path = model.or_else(|| config.categorizer.model_path());
        Self { config, model_path }
    }

    /// Load the categorizer once for the command's lifetime
    pub fn categorizer(&self) -> Categorizer {
        Categorizer::load_optional(self.model_path.as_deref())
    }
}

/// Read a transaction CSV and categorize every row
pub fn load_records(ctx: &AppContext, file: &Path) -> Result<Vec<TransactionRecord>> {
    let reader =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let records =
        parse_csv(reader).with_context(|| format!("Failed to parse CSV: {}", file.display()))?;
    Ok(categorize_rows(records, &ctx.categorizer()))
}

/// Parse `--today`, defaulting to the local date
pub fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context("Invalid --today date format (use YYYY-MM-DD)"),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
