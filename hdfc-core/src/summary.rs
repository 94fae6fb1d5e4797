//! Per-category aggregation of normalized spend.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::classifier::OTHER_CATEGORY;
use crate::merge::counts_toward_total;
use crate::transaction::{StatementType, Transaction};

/// Share of total spend below which a category is dropped from the chart.
/// The full data still reaches the exports.
pub const MIN_CHART_SHARE: f64 = 0.005;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// This category's share of the grand total, 0..=1.
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySummary {
    /// All categories, sorted by descending total.
    pub totals: Vec<CategoryTotal>,
    pub grand_total: f64,
}

impl CategorySummary {
    /// Categories above the chart threshold.
    pub fn chart_slices(&self) -> Vec<&CategoryTotal> {
        self.totals
            .iter()
            .filter(|t| t.share >= MIN_CHART_SHARE)
            .collect()
    }
}

/// Sum normalized spend per category over the rows that count for this
/// statement type. Expects classified, merged rows.
pub fn summarize(rows: &[Transaction], stype: StatementType) -> CategorySummary {
    let mut sums: HashMap<String, f64> = HashMap::new();
    let mut grand_total = 0.0;

    for txn in rows.iter().filter(|t| counts_toward_total(t, stype)) {
        let category = txn
            .category
            .clone()
            .unwrap_or_else(|| OTHER_CATEGORY.to_string());
        *sums.entry(category).or_insert(0.0) += txn.amount;
        grand_total += txn.amount;
    }

    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category,
            total,
            share: if grand_total > 0.0 {
                total / grand_total
            } else {
                0.0
            },
        })
        .collect();
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

    CategorySummary {
        totals,
        grand_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::RECONCILIATION_CATEGORY;
    use crate::transaction::Source;
    use chrono::NaiveDate;

    fn row(category: &str, amount: f64, source: Source) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: format!("{category} txn"),
            reference: None,
            amount,
            withdrawal_amount: None,
            source,
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn test_sums_and_descending_order() {
        let rows = vec![
            row("Food", 100.0, Source::Account),
            row("Shopping", 500.0, Source::Account),
            row("Food", 50.0, Source::CreditCard),
        ];
        let summary = summarize(&rows, StatementType::Account);
        assert_eq!(summary.grand_total, 650.0);
        assert_eq!(summary.totals[0].category, "Shopping");
        assert_eq!(summary.totals[1].category, "Food");
        assert_eq!(summary.totals[1].total, 150.0);
    }

    #[test]
    fn test_tiny_categories_leave_the_chart_not_the_totals() {
        let rows = vec![
            row("Shopping", 1000.0, Source::Account),
            row("Fees", 1.0, Source::Account), // 0.1% < threshold
        ];
        let summary = summarize(&rows, StatementType::Account);
        assert_eq!(summary.totals.len(), 2);
        let slices = summary.chart_slices();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].category, "Shopping");
    }

    #[test]
    fn test_zero_spend_category_never_charts() {
        let mut salary = row(OTHER_CATEGORY, 0.0, Source::Account);
        salary.description = "SALARY CREDIT".to_string();
        let rows = vec![row("Shopping", 500.0, Source::Account), salary];
        let summary = summarize(&rows, StatementType::Account);
        assert_eq!(summary.grand_total, 500.0);
        assert_eq!(summary.chart_slices().len(), 1);
    }

    #[test]
    fn test_reconciliation_excluded_from_total_sums() {
        let rows = vec![
            row(RECONCILIATION_CATEGORY, 5000.0, Source::Account),
            row("Food", 200.0, Source::CreditCard),
        ];
        let total = summarize(&rows, StatementType::Total);
        assert_eq!(total.grand_total, 200.0);
        // Outside total mode the bill payment is ordinary spend.
        let account_only = summarize(&rows, StatementType::Account);
        assert_eq!(account_only.grand_total, 5200.0);
    }
}
