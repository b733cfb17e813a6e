//! Aggregation of categorized transactions into totals and monthly series

use std::collections::BTreeMap;

use crate::models::{CategoryTotals, MonthlyAggregate, Period, TransactionRecord};

/// Sum of all amounts
pub fn total_spend(records: &[TransactionRecord]) -> f64 {
    records.iter().map(|r| r.amount).sum()
}

/// Per-category sums; uncategorized records count toward "Others"
pub fn category_totals(records: &[TransactionRecord]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for record in records {
        *totals
            .entry(record.category_or_others().to_string())
            .or_insert(0.0) += record.amount;
    }
    totals
}

/// Chronological per-month sums from the first to the last month present.
/// Months with no transactions in between appear with a zero amount.
pub fn monthly_totals(records: &[TransactionRecord]) -> Vec<MonthlyAggregate> {
    let mut by_period: BTreeMap<Period, f64> = BTreeMap::new();
    for record in records {
        *by_period.entry(record.period()).or_insert(0.0) += record.amount;
    }

    let (Some(&first), Some(&last)) = (by_period.keys().next(), by_period.keys().next_back())
    else {
        return vec![];
    };

    let mut monthly = Vec::new();
    let mut period = first;
    while period <= last {
        monthly.push(MonthlyAggregate {
            period,
            amount: by_period.get(&period).copied().unwrap_or(0.0),
        });
        period = period.next();
    }
    monthly
}

/// Spend recorded in one calendar month
pub fn period_spend(records: &[TransactionRecord], period: Period) -> f64 {
    records
        .iter()
        .filter(|r| period.contains(r.date))
        .map(|r| r.amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: &str, amount: f64, category: Option<&str>) -> TransactionRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        let record = TransactionRecord::new(date, "test", amount);
        match category {
            Some(c) => record.with_category(c),
            None => record,
        }
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(total_spend(&[]), 0.0);
        assert!(category_totals(&[]).is_empty());
        assert!(monthly_totals(&[]).is_empty());
    }

    #[test]
    fn test_category_totals_sorted_with_others() {
        let records = vec![
            tx("2024-01-05", 100.0, Some("Rent")),
            tx("2024-01-06", 20.0, Some("Food")),
            tx("2024-01-07", 5.0, None),
            tx("2024-01-08", 30.0, Some("Food")),
        ];

        let totals = category_totals(&records);
        let keys: Vec<&str> = totals.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Food", "Others", "Rent"]);
        assert_eq!(totals["Food"], 50.0);
        assert_eq!(total_spend(&records), 155.0);
    }

    #[test]
    fn test_monthly_totals_zero_fill_gaps() {
        let records = vec![
            tx("2024-03-01", 40.0, None),
            tx("2023-12-15", 10.0, None),
            tx("2023-12-20", 15.0, None),
        ];

        let monthly = monthly_totals(&records);
        let periods: Vec<String> = monthly.iter().map(|m| m.period.to_string()).collect();
        assert_eq!(periods, vec!["2023-12", "2024-01", "2024-02", "2024-03"]);

        let amounts: Vec<f64> = monthly.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![25.0, 0.0, 0.0, 40.0]);
    }

    #[test]
    fn test_period_spend_filters_by_month() {
        let records = vec![
            tx("2024-02-01", 10.0, None),
            tx("2024-02-29", 15.0, None),
            tx("2024-03-01", 99.0, None),
            tx("2023-02-10", 50.0, None),
        ];
        let feb = Period::new(2024, 2).unwrap();
        assert_eq!(period_spend(&records, feb), 25.0);
        assert_eq!(period_spend(&records, Period::new(2025, 1).unwrap()), 0.0);
    }
}
