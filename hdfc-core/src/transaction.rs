//! Canonical transaction schema shared by every statement source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which kind of statement a row came from. Drives spend normalization and
/// which side of a `total` merge the row lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Account,
    CreditCard,
}

/// Statement type selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Account,
    CreditCard,
    Total,
}

impl StatementType {
    /// Key of this statement type's table in the column config.
    pub fn column_key(&self) -> &'static str {
        match self {
            StatementType::Account | StatementType::Total => "default",
            StatementType::CreditCard => "cc",
        }
    }
}

/// A single statement row after column normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Never empty after normalization; rows with blank narrations are
    /// dropped by the parsers.
    pub description: String,
    /// Statement reference number, when the source prints one.
    pub reference: Option<String>,
    /// Signed amount as printed by the source. Credit-card statements use
    /// negative for money out; account statements leave this 0 and carry
    /// spend in `withdrawal_amount`. The merger rewrites it to the
    /// normalized (non-negative) spend.
    pub amount: f64,
    /// Account-statement withdrawal column. Absent on credit-card rows.
    pub withdrawal_amount: Option<f64>,
    pub source: Source,
    /// Assigned by the classifier; `None` until classification runs.
    pub category: Option<String>,
}

/// Date formats seen across account CSVs and extracted card statements.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"];

/// Parse a statement date, trying each known format.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a statement amount, tolerating thousands separators and currency
/// noise. `None` for blank or non-numeric cells.
pub fn parse_amount(s: &str) -> Option<f64> {
    let clean = s.replace(['₹', ','], "");
    let clean = clean.trim();
    if clean.is_empty() {
        return None;
    }
    clean.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_statement_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(parse_statement_date("02/01/2024"), Some(expected));
        assert_eq!(parse_statement_date("02/01/24"), Some(expected));
        assert_eq!(parse_statement_date("2024-01-02"), Some(expected));
        assert_eq!(parse_statement_date("Value Dt"), None);
        assert_eq!(parse_statement_date(""), None);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.50"), Some(1234.50));
        assert_eq!(parse_amount("-250.00"), Some(-250.00));
        assert_eq!(parse_amount("₹ 99.00"), Some(99.00));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("Closing Balance"), None);
    }
}
