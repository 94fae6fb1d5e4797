//! Statement merging and spend normalization.
//!
//! Sign and zero handling for every statement type lives here, in one
//! normalization table keyed by row source, instead of being re-derived per
//! command.

use log::debug;

use crate::error::{Error, Result};
use crate::transaction::{Source, StatementType, Transaction};

/// Description marker for intra-statement settlement transfers. Rows
/// carrying it are excluded before categorization, on either source.
pub const SETTLEMENT_MARKER: &str = "DUAL PYT";

/// Category excluded from the account side of a `total` merge, so a card
/// bill payment is not counted both as an account withdrawal and as the sum
/// of the underlying card transactions.
pub const RECONCILIATION_CATEGORY: &str = "CreditCard";

/// Normalized spend for one row:
/// account rows take the withdrawal column (missing -> 0); credit-card rows
/// are negative-means-money-out, so credits and refunds count as 0.
pub fn normalized_spend(txn: &Transaction) -> f64 {
    match txn.source {
        Source::Account => txn.withdrawal_amount.unwrap_or(0.0),
        Source::CreditCard => {
            if txn.amount < 0.0 {
                -txn.amount
            } else {
                0.0
            }
        }
    }
}

pub fn is_settlement(description: &str) -> bool {
    description.to_uppercase().contains(SETTLEMENT_MARKER)
}

/// Whether a classified row participates in sums and exports. Under `total`,
/// account-side rows classified as [`RECONCILIATION_CATEGORY`] do not.
pub fn counts_toward_total(txn: &Transaction, stype: StatementType) -> bool {
    !(stype == StatementType::Total
        && txn.source == Source::Account
        && txn.category.as_deref() == Some(RECONCILIATION_CATEGORY))
}

/// Combine per-source tables into one canonical table: concatenate, drop
/// settlement rows, rewrite `amount` to the normalized spend.
///
/// Errors with [`Error::Parse`] when the statement type's required side
/// produced zero rows (account side for `account`, combined credit-card rows
/// for `cc`/`total`).
pub fn merge_statements(
    account: Option<Vec<Transaction>>,
    cc_sets: Vec<Vec<Transaction>>,
    stype: StatementType,
) -> Result<Vec<Transaction>> {
    let account_rows = account.unwrap_or_default();
    let cc_rows: Vec<Transaction> = cc_sets.into_iter().flatten().collect();

    match stype {
        StatementType::Account if account_rows.is_empty() => {
            return Err(Error::Parse("account statement produced no rows".to_string()));
        }
        StatementType::CreditCard | StatementType::Total if cc_rows.is_empty() => {
            return Err(Error::Parse(
                "no credit-card statement produced any rows".to_string(),
            ));
        }
        _ => {}
    }

    let mut rows: Vec<Transaction> =
        account_rows.into_iter().chain(cc_rows).collect();

    rows.retain(|t| {
        let settlement = is_settlement(&t.description);
        if settlement {
            debug!("excluding settlement row: {}", t.description);
        }
        !settlement
    });

    for row in &mut rows {
        row.amount = normalized_spend(row);
    }

    Ok(rows)
}
