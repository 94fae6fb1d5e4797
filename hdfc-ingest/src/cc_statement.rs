//! Credit-card statement loading: password retry per file, delimited-row
//! parsing, and directory collection.

use log::{debug, warn};
use std::path::{Path, PathBuf};

use hdfc_core::{
    parse_amount, parse_statement_date, Error, Result, Source, Transaction,
};

use crate::pdf_text::PdfTextSource;

/// Parse extracted `date|description|reference|amount` rows. Malformed
/// lines are skipped; the amount keeps the source sign convention
/// (negative = money out) for the merger to normalize.
pub fn parse_cc_rows(text: &str) -> Vec<Transaction> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('|').collect();
        let &[date, description, reference, amount] = fields.as_slice() else {
            debug!("skipping malformed statement row: {line:?}");
            continue;
        };
        let Some(date) = parse_statement_date(date) else {
            continue;
        };
        let description = description.trim().to_string();
        if description.is_empty() {
            continue;
        }
        let Some(amount) = parse_amount(amount) else {
            continue;
        };
        rows.push(Transaction {
            date,
            description,
            reference: Some(reference.trim())
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            amount,
            withdrawal_amount: None,
            source: Source::CreditCard,
            category: None,
        });
    }
    rows
}

fn extract_with_passwords(
    file: &Path,
    cardholder: &str,
    passwords: &[String],
    source: &dyn PdfTextSource,
) -> Result<Vec<Transaction>> {
    if passwords.is_empty() {
        return Err(Error::Parse(format!(
            "{}: no passwords supplied",
            file.display()
        )));
    }
    let mut last_err = None;
    for password in passwords {
        match source.extract_text(file, cardholder, password) {
            Ok(text) => return Ok(parse_cc_rows(&text)),
            Err(e) => {
                debug!("{}: password candidate rejected: {e}", file.display());
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        Error::Parse(format!("{}: no password accepted", file.display()))
    }))
}

/// Load every statement file, trying each password in order. A file that
/// fails all passwords, or yields zero rows, is skipped with a warning;
/// the merger aborts the run if nothing at all parsed.
pub fn load_cc_statements(
    files: &[PathBuf],
    cardholder: &str,
    passwords: &[String],
    source: &dyn PdfTextSource,
) -> Result<Vec<Vec<Transaction>>> {
    let mut sets = Vec::new();
    for file in files {
        match extract_with_passwords(file, cardholder, passwords, source) {
            Ok(rows) if rows.is_empty() => {
                warn!("{}: no transaction rows found, skipping", file.display());
            }
            Ok(rows) => {
                debug!("{}: {} rows", file.display(), rows.len());
                sets.push(rows);
            }
            Err(e) => warn!("skipping statement: {e}"),
        }
    }
    Ok(sets)
}

/// Collect `*.pdf` files from a statement directory, sorted by name so
/// month-stamped filenames come out in order.
pub fn collect_pdf_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::Parse(format!("{}: {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();
    Ok(files)
}
