//! Index metadata.

use serde::{Deserialize, Serialize};

/// An index as listed in the whole-database document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Access method (`btree`, `hash`, `gin`, ...).
    pub method: String,
    pub is_unique: bool,
    pub is_primary: bool,
    /// False while a concurrent build is in progress or after it failed.
    pub is_valid: bool,
    /// Indexed columns in key order. Expression keys appear as their
    /// expression text.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Non-key columns carried by `INCLUDE`.
    #[serde(default)]
    pub include_columns: Vec<String>,
}

/// An index with the sizing and expression detail of the single-relation
/// documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDetail {
    #[serde(flatten)]
    pub index: Index,
    /// Raw per-key expressions as rendered by `pg_get_indexdef`.
    #[serde(default)]
    pub expressions: Vec<String>,
    /// Full `CREATE INDEX` statement.
    pub definition: Option<String>,
    /// Partial index predicate.
    pub predicate: Option<String>,
    /// On-disk size in bytes.
    pub size_bytes: Option<i64>,
    /// Page count from the last VACUUM/ANALYZE.
    pub pages: Option<i64>,
    /// Planner row estimate; `-1` when the index was never analyzed.
    pub estimated_rows: Option<f64>,
}

impl IndexDetail {
    /// Whether the index covers exactly these columns, in order.
    pub fn covers(&self, columns: &[&str]) -> bool {
        self.index.columns.len() == columns.len()
            && self
                .index
                .columns
                .iter()
                .zip(columns)
                .all(|(have, want)| have == want)
    }

    /// Whether this is a partial index.
    pub fn is_partial(&self) -> bool {
        self.predicate.is_some()
    }
}
