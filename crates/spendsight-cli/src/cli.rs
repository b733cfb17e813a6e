//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpendSight - Categorize, forecast and advise on personal spending
#[derive(Parser)]
#[command(name = "spendsight")]
#[command(about = "Personal spending analytics: categorize, forecast, advise, report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Categorizer artifact path (defaults to the data directory)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Config file path (defaults to the data directory override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the categorizer and write the model artifact
    Train {
        /// Labeled CSV with description,category columns (built-in seed set if omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Number of trees in the forest (overrides config)
        #[arg(long)]
        trees: Option<u16>,

        /// Random seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Output artifact path (defaults to --model, then the data directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Classify one or more transaction descriptions
    Classify {
        /// Descriptions to classify
        #[arg(required = true)]
        descriptions: Vec<String>,
    },

    /// Categorize a transaction CSV and write the labeled rows
    Import {
        /// CSV file with date,description,amount[,category] columns
        #[arg(short, long)]
        file: PathBuf,

        /// Output CSV (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show totals, forecast, budget status and suggestions
    Dashboard {
        /// CSV file with date,description,amount[,category] columns
        #[arg(short, long)]
        file: PathBuf,

        /// Monthly budget limit (0 = no budget)
        #[arg(short, long, default_value = "0")]
        budget: f64,

        /// Reference date for the current month (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Generate the PDF spending report
    Report {
        /// CSV file with date,description,amount[,category] columns
        #[arg(short, long)]
        file: PathBuf,

        /// Name shown on the report
        #[arg(short, long)]
        user: String,

        /// Monthly budget limit (0 = no budget)
        #[arg(short, long, default_value = "0")]
        budget: f64,

        /// Reference date for the current month (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Output PDF path (defaults to Finance_Report.pdf)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the categorizer artifact status
    Model,
}
