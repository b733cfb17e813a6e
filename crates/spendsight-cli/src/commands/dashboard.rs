//! Terminal spending summary

use std::path::Path;

use anyhow::Result;
use spendsight_core::models::format_amount;
use spendsight_core::{Advisor, BudgetState, Period, SpendingAnalysis};

use super::core::{load_records, resolve_today, AppContext};

pub fn cmd_dashboard(
    ctx: &AppContext,
    file: &Path,
    budget: f64,
    today: Option<&str>,
) -> Result<()> {
    let records = load_records(ctx, file)?;
    let today = resolve_today(today)?;
    let advisor = Advisor::new(&ctx.config.advisor);
    let analysis = SpendingAnalysis::compute(&records, budget, today, &advisor);
    let sym = &ctx.config.advisor.currency_symbol;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💰 SpendSight Dashboard         │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Transactions:    {}", records.len());
    println!("  Total Spending:  {}{}", sym, format_amount(analysis.total_spend));
    println!();

    if !analysis.category_totals.is_empty() {
        println!("  📊 By Category");
        for (category, amount) in &analysis.category_totals {
            println!("     {:<20} {:>14}", category, format_amount(*amount));
        }
        println!();
    }

    if !analysis.monthly.is_empty() {
        println!("  📅 Monthly");
        for month in &analysis.monthly {
            println!("     {}  {:>14}", month.period, format_amount(month.amount));
        }
        println!(
            "     Next month (est.): {}{} [{}]",
            sym,
            format_amount(analysis.forecast.estimate),
            analysis.forecast.method.as_str()
        );
        println!();
    }

    if analysis.budget.is_set() {
        println!(
            "  🎯 {}",
            budget_line(analysis.current_period, &analysis.budget, sym)
        );
        println!();
    }

    println!("  💡 Suggestions");
    for suggestion in &analysis.suggestions {
        println!("     • {}", suggestion);
    }
    println!();

    Ok(())
}

/// Spend against the limit for one month, with the share used and what is left
pub fn budget_line(period: Period, budget: &BudgetState, sym: &str) -> String {
    format!(
        "Budget {}: {}{} of {}{} ({:.0}%), {}{} remaining",
        period,
        sym,
        format_amount(budget.current_period_spend),
        sym,
        format_amount(budget.monthly_limit),
        budget.percent_used(),
        sym,
        format_amount(budget.remaining())
    )
}
