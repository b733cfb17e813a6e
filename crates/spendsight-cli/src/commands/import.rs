//! Classification and CSV categorization commands

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use spendsight_core::import::write_csv;

use super::core::{load_records, AppContext};

/// Print the label for each description
pub fn cmd_classify(ctx: &AppContext, descriptions: &[String]) -> Result<()> {
    let categorizer = ctx.categorizer();
    if !categorizer.is_trained() {
        eprintln!("⚠️  No trained model found; run 'spendsight train' first.");
    }

    let refs: Vec<&str> = descriptions.iter().map(String::as_str).collect();
    for (description, label) in descriptions.iter().zip(categorizer.classify_batch(&refs)) {
        println!("{} → {}", description, label);
    }

    Ok(())
}

/// Categorize a CSV and write it to `out` (stdout if `None`)
pub fn cmd_import(ctx: &AppContext, file: &Path, out: Option<&Path>) -> Result<()> {
    let records = load_records(ctx, file)?;

    match out {
        Some(path) => {
            let writer = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_csv(&records, BufWriter::new(writer)).context("Failed to write CSV")?;
            println!(
                "✅ Categorized {} transactions → {}",
                records.len(),
                path.display()
            );
        }
        None => {
            write_csv(&records, io::stdout().lock()).context("Failed to write CSV")?;
        }
    }

    Ok(())
}
