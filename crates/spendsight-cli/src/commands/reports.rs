//! PDF report command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use spendsight_core::report::build_document;
use spendsight_core::{Advisor, SpendingAnalysis, REPORT_FILENAME};

use super::core::{load_records, resolve_today, AppContext};

pub fn cmd_report(
    ctx: &AppContext,
    file: &Path,
    user: &str,
    budget: f64,
    today: Option<&str>,
    out: Option<&Path>,
) -> Result<()> {
    let records = load_records(ctx, file)?;
    let today = resolve_today(today)?;
    let advisor = Advisor::new(&ctx.config.advisor);
    let analysis = SpendingAnalysis::compute(&records, budget, today, &advisor);

    let document = analysis
        .report_document(user)
        .with_title(ctx.config.report.title.clone())
        .with_currency_symbol(ctx.config.advisor.currency_symbol.clone());
    let bytes = build_document(&document);

    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(REPORT_FILENAME));
    std::fs::write(&out, &bytes)
        .with_context(|| format!("Failed to write report: {}", out.display()))?;

    println!("📄 Report written to {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}
