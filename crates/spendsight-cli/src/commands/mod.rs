//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared setup (config, categorizer, CSV loading, dates)
//! - `training` - Categorizer training and artifact status
//! - `import` - Classification and CSV categorization
//! - `dashboard` - Spending summary in the terminal
//! - `reports` - PDF report generation

pub mod core;
pub mod dashboard;
pub mod import;
pub mod reports;
pub mod training;

// Re-export command functions for main.rs
pub use core::*;
pub use dashboard::*;
pub use import::*;
pub use reports::*;
pub use training::*;
