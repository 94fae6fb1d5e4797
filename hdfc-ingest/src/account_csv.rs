//! Parse bank account statement CSV exports into canonical transactions.
//!
//! Column names vary between export formats, so the header row is renamed
//! through the column mapping first. `date` and `description` must be
//! present after mapping; `withdrawal_amount`, `reference`, and `amount` are
//! read when the mapping provides them.

use log::debug;
use std::path::Path;

use hdfc_core::{
    parse_amount, parse_statement_date, ColumnMap, Error, Result, Source,
    Transaction,
};

fn require(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers.iter().position(|h| h == name).ok_or_else(|| {
        Error::Parse(format!(
            "{}: no {name:?} column after mapping; check the column config",
            path.display()
        ))
    })
}

/// Parse an account statement CSV, returning all valid transactions.
/// Rows with unparseable dates or blank narrations are skipped.
pub fn parse_account_csv(path: impl AsRef<Path>, columns: &ColumnMap) -> Result<Vec<Transaction>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::Parse(format!("{}: {e}", path.display())))?;

    let headers = columns.apply(rdr.headers()?);
    let date_i = require(&headers, "date", path)?;
    let desc_i = require(&headers, "description", path)?;
    let withdrawal_i = headers.iter().position(|h| h == "withdrawal_amount");
    let reference_i = headers.iter().position(|h| h == "reference");
    let amount_i = headers.iter().position(|h| h == "amount");

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;

        let Some(date) = record.get(date_i).and_then(parse_statement_date) else {
            continue;
        };
        let description = record.get(desc_i).unwrap_or("").trim().to_string();
        if description.is_empty() {
            debug!("{}: dated row with empty narration, skipping", path.display());
            continue;
        }

        let field = |i: Option<usize>| i.and_then(|i| record.get(i));
        rows.push(Transaction {
            date,
            description,
            reference: field(reference_i)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            amount: field(amount_i).and_then(parse_amount).unwrap_or(0.0),
            withdrawal_amount: field(withdrawal_i).and_then(parse_amount),
            source: Source::Account,
            category: None,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const STATEMENT: &str = "\
Date,Narration,Chq./Ref.No.,Value Dt,Withdrawal Amt.,Deposit Amt.,Closing Balance
02/01/24,AMAZON PURCHASE,0000123,02/01/24,500.00,,\"1,200.00\"
03/01/24,SALARY CREDIT,,03/01/24,,\"50,000.00\",\"51,200.00\"
,,,,,,
**Statement Summary**,,,,,,
";

    fn hdfc_columns() -> ColumnMap {
        let renames: HashMap<String, String> = [
            ("date", "Date"),
            ("description", "Narration"),
            ("reference", "Chq./Ref.No."),
            ("withdrawal_amount", "Withdrawal Amt."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        ColumnMap { renames }
    }

    fn write_statement(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_parse_account_statement() {
        let (_dir, path) = write_statement(STATEMENT);
        let rows = parse_account_csv(&path, &hdfc_columns()).unwrap();

        // Trailer and blank rows have no parseable date and are skipped.
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(rows[0].description, "AMAZON PURCHASE");
        assert_eq!(rows[0].withdrawal_amount, Some(500.0));
        assert_eq!(rows[0].reference.as_deref(), Some("0000123"));
        assert_eq!(rows[1].description, "SALARY CREDIT");
        assert_eq!(rows[1].withdrawal_amount, None);
        assert_eq!(rows[1].source, Source::Account);
    }

    #[test]
    fn test_missing_required_column_is_parse_error() {
        let (_dir, path) = write_statement(STATEMENT);
        let mut columns = hdfc_columns();
        columns.renames.remove("description");
        let err = parse_account_csv(&path, &columns).unwrap_err();
        assert!(matches!(err, Error::Parse(msg) if msg.contains("description")));
    }
}
