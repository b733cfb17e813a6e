//! SpendSight CLI - Personal spending analytics
//!
//! Usage:
//!   spendsight train                      Train the categorizer artifact
//!   spendsight classify "Uber Ride"       Classify descriptions
//!   spendsight import --file CSV          Categorize a statement
//!   spendsight dashboard --file CSV       Totals, forecast and suggestions
//!   spendsight report --file CSV --user NAME   Write the PDF report

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let ctx = commands::AppContext::load(cli.config.as_deref(), cli.model)?;

    match cli.command {
        Commands::Train {
            data,
            trees,
            seed,
            out,
        } => commands::cmd_train(&ctx, data.as_deref(), trees, seed, out.as_deref()),
        Commands::Classify { descriptions } => commands::cmd_classify(&ctx, &descriptions),
        Commands::Import { file, out } => commands::cmd_import(&ctx, &file, out.as_deref()),
        Commands::Dashboard {
            file,
            budget,
            today,
        } => commands::cmd_dashboard(&ctx, &file, budget, today.as_deref()),
        Commands::Report {
            file,
            user,
            budget,
            today,
            out,
        } => commands::cmd_report(&ctx, &file, &user, budget, today.as_deref(), out.as_deref()),
        Commands::Model => commands::cmd_model(&ctx),
    }
}
