//! Column mapping: renames heterogeneous source columns to the canonical
//! transaction schema, driven by a declarative TOML config.
//!
//! Config shape, one table per statement type:
//!
//! ```toml
//! [default]
//! date = "Date"
//! description = "Narration"
//! withdrawal_amount = "Withdrawal Amt."
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::transaction::StatementType;

/// Canonical field name -> source column name, for one statement type.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ColumnMap {
    pub renames: HashMap<String, String>,
}

impl ColumnMap {
    /// Rename source headers to canonical names. Headers not named in the
    /// mapping pass through unchanged (trimmed; HDFC exports pad them).
    ///
    /// Apply exactly once: re-applying a non-identity mapping leaves the
    /// already-canonical columns with nothing to match.
    pub fn apply(&self, headers: &csv::StringRecord) -> csv::StringRecord {
        let to_canonical: HashMap<&str, &str> = self
            .renames
            .iter()
            .map(|(canonical, source)| (source.as_str(), canonical.as_str()))
            .collect();

        headers
            .iter()
            .map(|h| {
                let h = h.trim();
                to_canonical.get(h).copied().unwrap_or(h)
            })
            .collect()
    }
}

/// The full column config: statement-type key -> [`ColumnMap`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ColumnConfig {
    tables: HashMap<String, ColumnMap>,
}

impl ColumnConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&body)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Mapping for a statement type. `account` is accepted as an alias for
    /// the `default` table.
    pub fn for_type(&self, stype: StatementType) -> Result<&ColumnMap> {
        let key = stype.column_key();
        self.tables
            .get(key)
            .or_else(|| (key == "default").then(|| self.tables.get("account")).flatten())
            .ok_or_else(|| Error::Config(format!("column config has no [{key}] table")))
    }
}
