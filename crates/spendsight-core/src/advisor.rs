//! Advisor - ordered budget suggestions from aggregated spend
//!
//! Suggestions come from an ordered list of independent rules. Each rule sees
//! the same [`SpendingSnapshot`] and contributes at most one message; the
//! output preserves rule order. Two cases bracket the list:
//! - no spending at all short-circuits to a single "start tracking" prompt
//! - if no rule fires, a single "balanced spending" message is returned
//!
//! Default rule order: budget status, category shares (Food, Entertainment,
//! Rent), low-spend nudge.

use tracing::debug;

use crate::config::{AdvisorConfig, CategoryRuleConfig};
use crate::models::{format_amount, CategoryTotals};

pub const START_TRACKING_MESSAGE: &str = "Start tracking your expenses by uploading a CSV!";
pub const BALANCED_MESSAGE: &str =
    "Your spending looks balanced! Keep maintaining this healthy budget.";
pub const LOW_SPEND_MESSAGE: &str =
    "Great job keeping your expenses low! Set a budget to track your saving goals better.";

/// Aggregated inputs every rule evaluates against
#[derive(Debug, Clone, Copy)]
pub struct SpendingSnapshot<'a> {
    pub category_totals: &'a CategoryTotals,
    pub total_spend: f64,
    pub budget_limit: f64,
    pub current_period_spend: f64,
}

impl SpendingSnapshot<'_> {
    /// Category's share of total spend as a percentage (0 if absent)
    pub fn share_percent(&self, category: &str) -> f64 {
        if self.total_spend == 0.0 {
            return 0.0;
        }
        self.category_totals
            .get(category)
            .map(|amount| amount / self.total_spend * 100.0)
            .unwrap_or(0.0)
    }
}

/// A single predicate → message rule
pub trait AdviceRule: Send + Sync {
    /// Stable identifier for logging
    fn id(&self) -> &str;

    /// Message to append, if the rule fires
    fn evaluate(&self, snapshot: &SpendingSnapshot<'_>) -> Option<String>;
}

/// Over-budget, near-limit or remaining-budget message (only with a budget)
pub struct BudgetStatusRule {
    near_limit_ratio: f64,
    currency_symbol: String,
}

impl BudgetStatusRule {
    pub fn new(near_limit_ratio: f64, currency_symbol: impl Into<String>) -> Self {
        Self {
            near_limit_ratio,
            currency_symbol: currency_symbol.into(),
        }
    }
}

impl AdviceRule for BudgetStatusRule {
    fn id(&self) -> &str {
        "budget_status"
    }

    fn evaluate(&self, s: &SpendingSnapshot<'_>) -> Option<String> {
        if s.budget_limit <= 0.0 {
            return None;
        }

        if s.current_period_spend > s.budget_limit {
            Some(format!(
                "You have exceeded your monthly budget by {}{}. Try to cut down on discretionary spending.",
                self.currency_symbol,
                format_amount(s.current_period_spend - s.budget_limit)
            ))
        } else if s.current_period_spend > s.budget_limit * self.near_limit_ratio {
            Some(format!(
                "You have reached {:.0}% of your budget. Be careful with your next few purchases.",
                self.near_limit_ratio * 100.0
            ))
        } else if s.current_period_spend > 0.0 {
            Some(format!(
                "You're doing great! You still have {}{} left in your budget.",
                self.currency_symbol,
                format_amount(s.budget_limit - s.current_period_spend)
            ))
        } else {
            None
        }
    }
}

/// Fires when one category's share of total spend exceeds a threshold
pub struct CategoryShareRule {
    id: String,
    category: String,
    max_share_percent: f64,
    message: String,
}

impl CategoryShareRule {
    pub fn new(category: &str, max_share_percent: f64, message: &str) -> Self {
        Self {
            id: format!("category_share:{}", category.to_lowercase()),
            category: category.to_string(),
            max_share_percent,
            message: message.to_string(),
        }
    }
}

impl From<&CategoryRuleConfig> for CategoryShareRule {
    fn from(config: &CategoryRuleConfig) -> Self {
        Self::new(&config.category, config.max_share_percent, &config.message)
    }
}

impl AdviceRule for CategoryShareRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn evaluate(&self, s: &SpendingSnapshot<'_>) -> Option<String> {
        (s.share_percent(&self.category) > self.max_share_percent).then(|| self.message.clone())
    }
}

/// Nudges users with modest spend and no budget to set one
pub struct LowSpendRule {
    threshold: f64,
}

impl LowSpendRule {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl AdviceRule for LowSpendRule {
    fn id(&self) -> &str {
        "low_spend"
    }

    fn evaluate(&self, s: &SpendingSnapshot<'_>) -> Option<String> {
        (s.total_spend < self.threshold && s.budget_limit == 0.0)
            .then(|| LOW_SPEND_MESSAGE.to_string())
    }
}

/// Ordered rule engine producing budget suggestions
pub struct Advisor {
    rules: Vec<Box<dyn AdviceRule>>,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(&AdvisorConfig::default())
    }
}

impl Advisor {
    /// Build the standard rule list from configuration
    pub fn new(config: &AdvisorConfig) -> Self {
        let mut advisor = Self::empty();

        advisor.register(Box::new(BudgetStatusRule::new(
            config.near_limit_ratio,
            config.currency_symbol.clone(),
        )));
        for rule in &config.category_rules {
            advisor.register(Box::new(CategoryShareRule::from(rule)));
        }
        advisor.register(Box::new(LowSpendRule::new(config.low_spend_threshold)));

        advisor
    }

    /// Advisor with no rules (only the start-tracking and balanced cases)
    pub fn empty() -> Self {
        Self { rules: vec![] }
    }

    /// Append a rule; it is evaluated after all previously registered rules
    pub fn register(&mut self, rule: Box<dyn AdviceRule>) {
        self.rules.push(rule);
    }

    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn suggest(
        &self,
        category_totals: &CategoryTotals,
        total_spend: f64,
        budget_limit: f64,
        current_period_spend: f64,
    ) -> Vec<String> {
        if total_spend == 0.0 {
            return vec![START_TRACKING_MESSAGE.to_string()];
        }

        let snapshot = SpendingSnapshot {
            category_totals,
            total_spend,
            budget_limit,
            current_period_spend,
        };

        let mut suggestions: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let message = rule.evaluate(&snapshot);
                if message.is_some() {
                    debug!(rule = rule.id(), "Advice rule fired");
                }
                message
            })
            .collect();

        if suggestions.is_empty() {
            suggestions.push(BALANCED_MESSAGE.to_string());
        }

        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, f64)]) -> CategoryTotals {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    const FOOD: &str = "Your food spending is over 30%";
    const LEISURE: &str = "Leisure spending is high";
    const RENT: &str = "Rent is taking up more than 40%";
    const NEAR: &str = "You have reached 90% of your budget";
    const REMAINING: &str = "You still have";
    const OVER: &str = "exceeded your monthly budget";

    fn contains(suggestions: &[String], needle: &str) -> bool {
        suggestions.iter().any(|s| s.contains(needle))
    }

    #[test]
    fn test_zero_spend_only_start_tracking() {
        let advisor = Advisor::default();
        assert_eq!(
            advisor.suggest(&CategoryTotals::new(), 0.0, 0.0, 0.0),
            vec![START_TRACKING_MESSAGE.to_string()]
        );
        // Even with a budget and category data, nothing else is evaluated
        assert_eq!(
            advisor.suggest(&totals(&[("Food", 0.0)]), 0.0, 1000.0, 1200.0),
            vec![START_TRACKING_MESSAGE.to_string()]
        );
    }

    #[test]
    fn test_over_budget_states_overage() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(&totals(&[("Bills", 20_000.0)]), 20_000.0, 1000.0, 1200.0);

        assert!(contains(&suggestions, OVER));
        assert!(contains(&suggestions, "200.00"));
        assert!(!contains(&suggestions, NEAR));
        assert!(!contains(&suggestions, REMAINING));
    }

    #[test]
    fn test_near_limit_warning() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(&totals(&[("Bills", 20_000.0)]), 20_000.0, 1000.0, 950.0);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains(NEAR));
    }

    #[test]
    fn test_exactly_at_limit_is_near_not_over() {
        let advisor = Advisor::default();
        let suggestions =
            advisor.suggest(&totals(&[("Bills", 20_000.0)]), 20_000.0, 1000.0, 1000.0);
        assert!(contains(&suggestions, NEAR));
        assert!(!contains(&suggestions, OVER));
    }

    #[test]
    fn test_remaining_budget_encouragement() {
        let advisor = Advisor::default();
        let suggestions =
            advisor.suggest(&totals(&[("Bills", 20_000.0)]), 20_000.0, 2500.0, 1234.5);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains(REMAINING));
        assert!(suggestions[0].contains("₹1,265.50"));
    }

    #[test]
    fn test_budget_with_no_current_spend_is_silent() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(&totals(&[("Bills", 20_000.0)]), 20_000.0, 1000.0, 0.0);
        assert_eq!(suggestions, vec![BALANCED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_food_share_without_low_spend() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(&totals(&[("Food", 3500.0)]), 10_000.0, 0.0, 0.0);

        assert!(contains(&suggestions, FOOD));
        assert!(!contains(&suggestions, "Great job keeping your expenses low"));
        assert_eq!(suggestions.len(), 1);
    }

    #[test]
    fn test_category_thresholds_are_strict() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(
            &totals(&[("Food", 3000.0), ("Entertainment", 2000.0), ("Rent", 4000.0)]),
            10_000.0,
            0.0,
            0.0,
        );
        assert_eq!(suggestions, vec![BALANCED_MESSAGE.to_string()]);
    }

    #[test]
    fn test_full_ordering() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(
            &totals(&[("Rent", 450.0), ("Entertainment", 250.0), ("Food", 300.0)]),
            1000.0,
            0.0,
            0.0,
        );
        // Food at exactly 30% does not fire; the nudge comes last
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].contains(LEISURE));
        assert!(suggestions[1].contains(RENT));
        assert_eq!(suggestions[2], LOW_SPEND_MESSAGE);

        let suggestions = advisor.suggest(
            &totals(&[("Rent", 4100.0), ("Entertainment", 2100.0), ("Food", 3100.0)]),
            9000.0,
            800.0,
            1000.0,
        );
        assert_eq!(suggestions.len(), 4);
        assert!(suggestions[0].contains(OVER));
        assert!(suggestions[1].contains(FOOD));
        assert!(suggestions[2].contains(LEISURE));
        assert!(suggestions[3].contains(RENT));
    }

    #[test]
    fn test_low_spend_nudge_without_budget() {
        let advisor = Advisor::default();
        let suggestions = advisor.suggest(&totals(&[("Bills", 500.0)]), 500.0, 0.0, 0.0);
        assert_eq!(suggestions, vec![LOW_SPEND_MESSAGE.to_string()]);
    }

    #[test]
    fn test_rule_order_is_declared_order() {
        let advisor = Advisor::default();
        assert_eq!(
            advisor.rule_ids(),
            vec![
                "budget_status",
                "category_share:food",
                "category_share:entertainment",
                "category_share:rent",
                "low_spend",
            ]
        );
    }

    #[test]
    fn test_custom_rule_appends_in_order() {
        struct AlwaysFires;
        impl AdviceRule for AlwaysFires {
            fn id(&self) -> &str {
                "always"
            }
            fn evaluate(&self, _: &SpendingSnapshot<'_>) -> Option<String> {
                Some("custom".to_string())
            }
        }

        let mut advisor = Advisor::empty();
        advisor.register(Box::new(CategoryShareRule::new("Travel", 10.0, "travel")));
        advisor.register(Box::new(AlwaysFires));

        let suggestions = advisor.suggest(&totals(&[("Travel", 50.0)]), 100.0, 0.0, 0.0);
        assert_eq!(suggestions, vec!["travel".to_string(), "custom".to_string()]);
    }

    #[test]
    fn test_configured_thresholds() {
        let config = AdvisorConfig {
            low_spend_threshold: 100.0,
            currency_symbol: "$".to_string(),
            ..AdvisorConfig::default()
        };
        let advisor = Advisor::new(&config);
        let suggestions = advisor.suggest(&totals(&[("Bills", 500.0)]), 500.0, 1000.0, 1200.0);
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].contains("$200.00"));
    }
}
