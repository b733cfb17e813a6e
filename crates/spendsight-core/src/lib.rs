//! SpendSight Core Library
//!
//! Financial analytics pipeline for personal spending data:
//! - Categorizer: TF-IDF + random forest text classifier with an "Others" fallback
//! - Forecaster: next-month estimate from a least squares trend
//! - Advisor: ordered budget rules producing suggestions
//! - Reporter: paginated PDF summary
//! - CSV ingestion, aggregation and dashboard composition

pub mod advisor;
pub mod aggregate;
pub mod categorizer;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecaster;
pub mod import;
pub mod models;
pub mod report;

pub use advisor::{AdviceRule, Advisor, SpendingSnapshot};
pub use categorizer::{Categorizer, ClassifierModel, SeedExample};
pub use config::{AdvisorConfig, Config, ReportConfig, TrainingConfig};
pub use dashboard::SpendingAnalysis;
pub use error::{Error, Result};
pub use forecaster::{predict_next_period, Forecast, ForecastMethod};
pub use models::{
    BudgetState, CategoryTotals, MonthlyAggregate, Period, TransactionRecord, OTHERS_CATEGORY,
};
pub use report::{build_report, ReportDocument, REPORT_FILENAME, REPORT_MIME_TYPE};
