//! hdfc-core: canonical schema, column normalization, categorization, and
//! merge logic for statement analytics.

pub mod categories;
pub mod classifier;
pub mod columns;
pub mod error;
pub mod merge;
pub mod summary;
pub mod transaction;

pub use categories::{Categories, CategoryRule};
pub use classifier::{Classifier, KeywordStrategy, Strategy, OTHER_CATEGORY};
pub use columns::{ColumnConfig, ColumnMap};
pub use error::{Error, Result};
pub use merge::{
    counts_toward_total, is_settlement, merge_statements, normalized_spend,
    RECONCILIATION_CATEGORY, SETTLEMENT_MARKER,
};
pub use summary::{summarize, CategorySummary, CategoryTotal, MIN_CHART_SHARE};
pub use transaction::{
    parse_amount, parse_statement_date, Source, StatementType, Transaction,
};
