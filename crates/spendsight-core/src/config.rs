//! Configuration for the analytics pipeline
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/spendsight/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Every key is optional; missing keys keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/spendsight.toml");

const APP_DIR: &str = "spendsight";
const MODEL_FILE: &str = "expense_model.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub categorizer: CategorizerConfig,
    pub training: TrainingConfig,
    pub advisor: AdvisorConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizerConfig {
    /// Artifact path; `None` means the well-known data dir location
    pub model_path: Option<PathBuf>,
}

impl CategorizerConfig {
    /// Resolved artifact path
    pub fn model_path(&self) -> Option<PathBuf> {
        self.model_path.clone().or_else(default_model_path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    pub n_trees: u16,
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
        }
    }
}

/// Thresholds and wording for the budget advisor
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub currency_symbol: String,
    /// Fraction of the monthly limit that triggers the near-limit warning
    pub near_limit_ratio: f64,
    /// Total spend under which an unbudgeted user is nudged to set a budget
    pub low_spend_threshold: f64,
    /// Category share rules, evaluated in order
    pub category_rules: Vec<CategoryRuleConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryRuleConfig {
    pub category: String,
    pub max_share_percent: f64,
    pub message: String,
}

impl CategoryRuleConfig {
    fn new(category: &str, max_share_percent: f64, message: &str) -> Self {
        Self {
            category: category.to_string(),
            max_share_percent,
            message: message.to_string(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
            near_limit_ratio: 0.9,
            low_spend_threshold: 10_000.0,
            category_rules: vec![
                CategoryRuleConfig::new(
                    "Food",
                    30.0,
                    "Your food spending is over 30% of your total expense. Consider eating out less or meal prepping.",
                ),
                CategoryRuleConfig::new(
                    "Entertainment",
                    20.0,
                    "Leisure spending is high (20%+). You might want to review your active subscriptions.",
                ),
                CategoryRuleConfig::new(
                    "Rent",
                    40.0,
                    "Rent is taking up more than 40% of your expenses. Consider looking for more affordable housing or sharing costs.",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Financial Analysis Report".to_string(),
        }
    }
}

impl Config {
    /// Load config from `path` (which must exist), else the data dir
    /// override if present, else the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path.filter(|p| !p.exists()) {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                p.display()
            )));
        }

        let override_path = path.map(Path::to_path_buf).or_else(default_config_path);

        let content = match override_path {
            Some(ref p) if p.exists() => {
                tracing::debug!(path = %p.display(), "Loading config override");
                fs::read_to_string(p)
                    .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
            }
            _ => DEFAULT_CONFIG.to_string(),
        };

        parse_config(&content)
    }

    /// Embedded defaults only
    pub fn embedded() -> Result<Self> {
        parse_config(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Well-known location of the trained categorizer artifact
pub fn default_model_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join(APP_DIR).join("models").join(MODEL_FILE))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    categorizer: Option<RawCategorizer>,
    training: Option<RawTraining>,
    advisor: Option<RawAdvisor>,
    report: Option<RawReport>,
}

#[derive(Debug, Deserialize)]
struct RawCategorizer {
    model_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawTraining {
    n_trees: Option<u16>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawAdvisor {
    currency_symbol: Option<String>,
    near_limit_ratio: Option<f64>,
    low_spend_threshold: Option<f64>,
    category_rules: Option<Vec<CategoryRuleConfig>>,
}

#[derive(Debug, Deserialize)]
struct RawReport {
    title: Option<String>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(categorizer) = raw.categorizer {
        config.categorizer.model_path = categorizer.model_path;
    }

    if let Some(training) = raw.training {
        if let Some(n_trees) = training.n_trees {
            if n_trees == 0 {
                return Err(Error::Config("training.n_trees must be at least 1".into()));
            }
            config.training.n_trees = n_trees;
        }
        if let Some(seed) = training.seed {
            config.training.seed = seed;
        }
    }

    if let Some(advisor) = raw.advisor {
        if let Some(symbol) = advisor.currency_symbol {
            config.advisor.currency_symbol = symbol;
        }
        if let Some(ratio) = advisor.near_limit_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(Error::Config(format!(
                    "advisor.near_limit_ratio must be between 0 and 1, got {}",
                    ratio
                )));
            }
            config.advisor.near_limit_ratio = ratio;
        }
        if let Some(threshold) = advisor.low_spend_threshold {
            config.advisor.low_spend_threshold = threshold;
        }
        if let Some(rules) = advisor.category_rules {
            config.advisor.category_rules = rules;
        }
    }

    if let Some(report) = raw.report {
        if let Some(title) = report.title {
            config.report.title = title;
        }
    }

    Ok(config)
}
