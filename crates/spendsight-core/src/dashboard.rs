//! Dashboard composition: one pass from categorized records to every
//! figure the summary views show.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::advisor::Advisor;
use crate::aggregate::{category_totals, monthly_totals, period_spend, total_spend};
use crate::forecaster::{forecast_monthly, Forecast};
use crate::models::{BudgetState, CategoryTotals, MonthlyAggregate, Period, TransactionRecord};
use crate::report::ReportDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingAnalysis {
    pub total_spend: f64,
    pub category_totals: CategoryTotals,
    pub monthly: Vec<MonthlyAggregate>,
    pub forecast: Forecast,
    /// Period the budget is measured against (the month containing `today`)
    pub current_period: Period,
    pub budget: BudgetState,
    pub suggestions: Vec<String>,
}

impl SpendingAnalysis {
    pub fn compute(
        records: &[TransactionRecord],
        monthly_limit: f64,
        today: NaiveDate,
        advisor: &Advisor,
    ) -> Self {
        let total = total_spend(records);
        let totals = category_totals(records);
        let monthly = monthly_totals(records);
        let forecast = forecast_monthly(&monthly);

        let current_period = Period::from_date(today);
        let budget = BudgetState::new(monthly_limit, period_spend(records, current_period));
        let suggestions = advisor.suggest(
            &totals,
            total,
            budget.monthly_limit,
            budget.current_period_spend,
        );

        debug!(
            records = records.len(),
            months = monthly.len(),
            period = %current_period,
            suggestions = suggestions.len(),
            "Computed spending analysis"
        );

        Self {
            total_spend: total,
            category_totals: totals,
            monthly,
            forecast,
            current_period,
            budget,
            suggestions,
        }
    }

    /// Report content for this analysis
    pub fn report_document(&self, user: &str) -> ReportDocument {
        ReportDocument::new(
            user,
            self.total_spend,
            &self.category_totals,
            &self.suggestions,
        )
    }
}
