//! Terminal proportion chart and CSV exports for a categorized table.

use std::cmp::Ordering;
use std::path::Path;

use hdfc_core::{
    counts_toward_total, CategorySummary, Result, StatementType, Transaction,
    OTHER_CATEGORY,
};

/// All categorized spend rows, for downstream spreadsheets.
pub const EXPENSES_FILE: &str = "expenses.csv";

/// Uncategorized rows, biggest first, for keyword-rule curation.
pub const OTHER_FILE: &str = "other_transactions.csv";

const BAR_WIDTH: f64 = 40.0;

/// Print the proportion chart: one line per category above the share
/// threshold, labeled with percentage and name.
pub fn render_summary(summary: &CategorySummary) {
    println!("\nExpenses by Category");
    println!("--------------------");
    let slices = summary.chart_slices();
    if slices.is_empty() {
        println!("(no spend)");
        return;
    }

    let width = slices.iter().map(|s| s.category.len()).max().unwrap_or(0);
    for slice in slices {
        let bar = "#".repeat((slice.share * BAR_WIDTH).round().max(1.0) as usize);
        println!(
            "{:<width$}  {:>5.1}%  {:>12.2}  {bar}",
            slice.category,
            slice.share * 100.0,
            slice.total,
        );
    }
    println!("{:<width$}  {:>6}  {:>12.2}", "Total", "", summary.grand_total);
}

fn write_rows<'a>(
    path: &Path,
    rows: impl Iterator<Item = &'a Transaction>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["date", "description", "reference", "amount", "category"])?;
    for t in rows {
        wtr.write_record([
            t.date.to_string().as_str(),
            t.description.as_str(),
            t.reference.as_deref().unwrap_or(""),
            format!("{:.2}", t.amount).as_str(),
            t.category.as_deref().unwrap_or(OTHER_CATEGORY),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the spend-filtered categorized table (rows that count for this
/// statement type and carry non-zero spend).
pub fn export_expenses(
    rows: &[Transaction],
    stype: StatementType,
    path: &Path,
) -> Result<()> {
    write_rows(
        path,
        rows.iter()
            .filter(|t| counts_toward_total(t, stype) && t.amount > 0.0),
    )
}

/// Write all `Other` rows sorted by descending amount, so the biggest
/// unmatched merchants surface first.
pub fn export_other(rows: &[Transaction], path: &Path) -> Result<()> {
    let mut other: Vec<&Transaction> = rows
        .iter()
        .filter(|t| t.category.as_deref() == Some(OTHER_CATEGORY))
        .collect();
    other.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
    write_rows(path, other.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hdfc_core::Source;

    fn row(description: &str, amount: f64, category: &str) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description: description.to_string(),
            reference: None,
            amount,
            withdrawal_amount: None,
            source: Source::CreditCard,
            category: Some(category.to_string()),
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_export_expenses_filters_zero_spend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPENSES_FILE);
        let rows = vec![
            row("SWIGGY", 450.0, "Food"),
            row("CASHBACK", 0.0, "Food"),
        ];
        export_expenses(&rows, StatementType::CreditCard, &path).unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2); // header + one spend row
        assert!(lines[1].contains("SWIGGY"));
        assert!(lines[1].contains("450.00"));
    }

    #[test]
    fn test_export_other_sorted_descending() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OTHER_FILE);
        let rows = vec![
            row("SMALL UNKNOWN", 10.0, OTHER_CATEGORY),
            row("SWIGGY", 450.0, "Food"),
            row("BIG UNKNOWN", 900.0, OTHER_CATEGORY),
        ];
        export_other(&rows, &path).unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("BIG UNKNOWN"));
        assert!(lines[2].contains("SMALL UNKNOWN"));
    }
}
