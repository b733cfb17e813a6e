//! Data models for the analytics pipeline

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Label assigned when no trained model is available or a description
/// carries no usable terms.
pub const OTHERS_CATEGORY: &str = "Others";

/// A single dated transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: String,
    /// Signed amount; spending is recorded as a positive number
    pub amount: f64,
    /// Category label (absent only before categorization)
    pub category: Option<String>,
}

impl TransactionRecord {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Category label, treating an absent label as "Others"
    pub fn category_or_others(&self) -> &str {
        self.category.as_deref().unwrap_or(OTHERS_CATEGORY)
    }

    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }
}

/// A calendar month, the unit of aggregation for forecasting and budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Returns `None` if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Summed spending for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub period: Period,
    pub amount: f64,
}

/// Category label → summed amount, iterated in label order
pub type CategoryTotals = BTreeMap<String, f64>;

/// Monthly budget and the spend recorded against it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetState {
    /// Zero means no budget has been set
    pub monthly_limit: f64,
    pub current_period_spend: f64,
}

impl BudgetState {
    /// Negative inputs are floored at zero
    pub fn new(monthly_limit: f64, current_period_spend: f64) -> Self {
        Self {
            monthly_limit: monthly_limit.max(0.0),
            current_period_spend: current_period_spend.max(0.0),
        }
    }

    pub fn is_set(&self) -> bool {
        self.monthly_limit > 0.0
    }

    /// Share of the limit already spent, as a percentage (0 when no budget)
    pub fn percent_used(&self) -> f64 {
        if self.is_set() {
            self.current_period_spend / self.monthly_limit * 100.0
        } else {
            0.0
        }
    }

    /// Budget left this period, never negative
    pub fn remaining(&self) -> f64 {
        (self.monthly_limit - self.current_period_spend).max(0.0)
    }
}

/// Format an amount with thousands separators and two decimals
/// (`1234.5` → `"1,234.50"`).
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}
