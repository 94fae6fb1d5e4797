//! Decrypt password-protected credit-card statement PDFs and reassemble the
//! transaction table into delimited text rows.
//!
//! Output contract, one row per line:
//!
//! ```text
//! date|description|reference|amount
//! ```
//!
//! with the amount signed: negative means money out, positive a
//! credit/refund. Statement text puts each table cell in its own text
//! operation, so rows are rebuilt with a small state machine anchored on
//! transaction dates.

use log::debug;
use pdf::content::Op;
use pdf::file::FileOptions;
use regex::Regex;
use std::path::Path;

use hdfc_core::{parse_amount, Error, Result};

/// Source of decoded statement text rows. Behind a trait so the multi-file,
/// multi-password loading logic can be driven from canned text in tests.
pub trait PdfTextSource {
    /// Extract delimited rows from one statement file. A wrong password is
    /// an error; callers try their next candidate.
    fn extract_text(&self, path: &Path, cardholder: &str, password: &str) -> Result<String>;
}

/// Extractor backed by the `pdf` crate.
pub struct PdfExtractor;

/// Transaction date cell, e.g. `19/10/2025` or `19/10/2025| 00:57`.
const DATE_CELL: &str = r"^\d{2}/\d{2}/\d{4}";

/// Reference-number cells are long digit runs; short ones are reward points.
const REFERENCE_CELL: &str = r"^\d{6,}$";

/// Standalone markers in the text stream that are not row data.
fn is_noise(text: &str) -> bool {
    matches!(text, "C" | "₹" | "l" | "●" | "•")
        || (text.starts_with("Page ") && text.contains(" of "))
}

#[derive(Default)]
struct RowState {
    date: Option<String>,
    desc_parts: Vec<String>,
    reference: Option<String>,
    amount: Option<f64>,
}

impl RowState {
    fn start(date: String) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    fn emit(&self, out: &mut String) {
        let (Some(date), Some(amount)) = (&self.date, self.amount) else {
            return;
        };
        if self.desc_parts.is_empty() {
            return;
        }
        out.push_str(&format!(
            "{date}|{}|{}|{amount:.2}\n",
            self.desc_parts.join(" "),
            self.reference.as_deref().unwrap_or(""),
        ));
    }
}

impl PdfTextSource for PdfExtractor {
    fn extract_text(&self, path: &Path, cardholder: &str, password: &str) -> Result<String> {
        let file = FileOptions::cached()
            .password(password.as_bytes())
            .open(path)
            .map_err(|e| Error::Parse(format!("{}: {e}", path.display())))?;

        let date_re = Regex::new(DATE_CELL).map_err(|e| Error::Parse(e.to_string()))?;
        let reference_re =
            Regex::new(REFERENCE_CELL).map_err(|e| Error::Parse(e.to_string()))?;

        let mut out = String::new();
        for page in file.pages() {
            let Ok(page) = page else { continue };
            let Some(content) = &page.contents else { continue };
            let Ok(ops) = content.operations(&file) else { continue };

            let mut row = RowState::default();
            let mut credit = false;
            for op in &ops {
                let Op::TextDraw { text } = op else { continue };
                let Ok(text) = std::str::from_utf8(text.as_bytes()) else {
                    continue;
                };
                let text = text.trim();
                if text.is_empty() || text == cardholder {
                    continue;
                }

                if let Some(m) = date_re.find(text) {
                    row.emit(&mut out);
                    row = RowState::start(m.as_str().to_string());
                    credit = false;
                    continue;
                }
                if row.date.is_none() {
                    continue;
                }

                if text == "+" || text == "Cr" {
                    // Credit marker; flips the amount back to positive.
                    credit = true;
                    if let Some(amount) = row.amount.as_mut() {
                        *amount = amount.abs();
                    }
                    continue;
                }
                if is_noise(text) {
                    continue;
                }
                if text.contains('.') {
                    if let Some(value) = parse_amount(text) {
                        // Spend convention: negative means money out.
                        row.amount =
                            Some(if credit { value.abs() } else { -value.abs() });
                        continue;
                    }
                }
                if reference_re.is_match(text) {
                    row.reference = Some(text.to_string());
                    continue;
                }
                if text.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '+') {
                    // Reward points column.
                    continue;
                }
                row.desc_parts.push(text.to_string());
            }
            row.emit(&mut out);
        }

        debug!(
            "{}: extracted {} candidate rows",
            path.display(),
            out.lines().count()
        );
        Ok(out)
    }
}
