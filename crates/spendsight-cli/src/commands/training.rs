//! Categorizer training and artifact status commands

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use spendsight_core::categorizer::{read_seed_csv, seed_dataset, train};
use spendsight_core::config::TrainingConfig;

use super::core::AppContext;

/// Train the classifier and write the artifact
pub fn cmd_train(
    ctx: &AppContext,
    data: Option<&Path>,
    trees: Option<u16>,
    seed: Option<u64>,
    out: Option<&Path>,
) -> Result<()> {
    let out = out
        .map(Path::to_path_buf)
        .or_else(|| ctx.model_path.clone())
        .ok_or_else(|| anyhow::anyhow!("No data directory available; pass --out"))?;

    let examples = match data {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open training data: {}", path.display()))?;
            read_seed_csv(file)
                .with_context(|| format!("Failed to parse training data: {}", path.display()))?
        }
        None => seed_dataset(),
    };

    let params = TrainingConfig {
        n_trees: trees.unwrap_or(ctx.config.training.n_trees),
        seed: seed.unwrap_or(ctx.config.training.seed),
    };

    println!(
        "🧠 Training on {} examples ({} trees, seed {})...",
        examples.len(),
        params.n_trees,
        params.seed
    );

    let model = train(&examples, &params).context("Training failed")?;
    model
        .save(&out)
        .with_context(|| format!("Failed to write model artifact: {}", out.display()))?;

    println!("✅ Model saved to {}", out.display());
    println!("   Labels: {}", model.labels().join(", "));
    if let Ok(fingerprint) = model.fingerprint() {
        println!("   Fingerprint: {}", fingerprint);
    }

    Ok(())
}

/// Show where the artifact lives and what it contains
pub fn cmd_model(ctx: &AppContext) -> Result<()> {
    let Some(path) = ctx.model_path.as_deref() else {
        println!("⚠️  No model path configured and no data directory available.");
        return Ok(());
    };

    println!();
    println!("📦 Categorizer model");
    println!("   ─────────────────────────────");
    println!("   Path: {}", path.display());

    let categorizer = ctx.categorizer();
    if !categorizer.is_trained() {
        println!("   Status: not trained (every description is labeled \"Others\")");
        println!();
        println!("   Train one with: spendsight train");
        return Ok(());
    }

    println!("   Status: loaded");
    if let Some(fingerprint) = categorizer.fingerprint() {
        println!("   Fingerprint: {}", fingerprint);
    }
    println!("   Labels: {}", categorizer.labels().join(", "));

    Ok(())
}
