//! hdfc-ingest: statement ingestion (account CSV, credit-card PDF text) and
//! row parsers producing the canonical transaction schema.

pub mod account_csv;
pub mod cc_statement;
pub mod pdf_text;

pub use account_csv::parse_account_csv;
pub use cc_statement::{collect_pdf_files, load_cc_statements, parse_cc_rows};
pub use pdf_text::{PdfExtractor, PdfTextSource};
