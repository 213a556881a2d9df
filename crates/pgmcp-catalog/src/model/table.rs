//! Table metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CheckConstraint, Column, ForeignKey, Index, IndexDetail, TableConstraints};

/// A table inside the whole-database document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStructure {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub check_constraints: Vec<CheckConstraint>,
}

impl TableStructure {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Name, comment, row count and size of a table or materialized view, as
/// listed in a schema summary.
///
/// `row_count` is approximate: it comes from the statistics collector's
/// insert counter, not from counting rows, unless the summary was produced
/// with [`RowCountMode::Exact`](crate::RowCountMode::Exact).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationSummary {
    pub name: String,
    pub description: Option<String>,
    pub row_count: i64,
    /// Total size including indexes and TOAST.
    pub size_bytes: i64,
}

/// Header of the single-table document.
///
/// Every field is null when the requested table does not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    pub schema: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Approximate row count; see [`RelationSummary`].
    pub row_count: Option<i64>,
    /// Total size including indexes and TOAST.
    pub size_bytes: Option<i64>,
    /// Main fork size.
    pub data_bytes: Option<i64>,
    /// Combined size of all indexes.
    pub index_bytes: Option<i64>,
}

/// Activity counters from `pg_stat_all_tables`.
///
/// All fields are null when the statistics collector has no entry for the
/// relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub seq_scan: Option<i64>,
    pub seq_tup_read: Option<i64>,
    pub idx_scan: Option<i64>,
    pub idx_tup_fetch: Option<i64>,
    /// Estimated live tuples.
    pub live_tuples: Option<i64>,
    pub dead_tuples: Option<i64>,
    pub last_vacuum: Option<DateTime<Utc>>,
    pub last_autovacuum: Option<DateTime<Utc>>,
    pub last_analyze: Option<DateTime<Utc>>,
    pub last_autoanalyze: Option<DateTime<Utc>>,
}

/// The single-table document returned by `get_schema_table`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDetail {
    pub table: TableInfo,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub constraints: TableConstraints,
    #[serde(default)]
    pub indexes: Vec<IndexDetail>,
    #[serde(default)]
    pub statistics: Statistics,
}

impl TableDetail {
    /// Whether the requested table exists.
    pub fn found(&self) -> bool {
        self.table.name.is_some()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn orders_document() -> serde_json::Value {
        json!({
            "table": {
                "schema": "shop",
                "name": "orders",
                "description": null,
                "row_count": 12,
                "size_bytes": 49152,
                "data_bytes": 8192,
                "index_bytes": 32768
            },
            "columns": [
                {"name": "id", "type": "integer", "nullable": false,
                 "default": "nextval('shop.orders_id_seq'::regclass)", "description": null,
                 "ordinal_position": 1, "constraints": ["PRIMARY KEY"], "is_identity": false,
                 "identity_generation": null, "generated": null, "storage": "plain"},
                {"name": "customer_id", "type": "integer", "nullable": true, "default": null,
                 "description": null, "ordinal_position": 2, "constraints": ["FOREIGN KEY"],
                 "is_identity": false, "identity_generation": null, "generated": null, "storage": "plain"},
                {"name": "total", "type": "numeric", "nullable": true, "default": null,
                 "description": null, "ordinal_position": 3, "constraints": [],
                 "is_identity": false, "identity_generation": null, "generated": null, "storage": "main"}
            ],
            "constraints": {
                "primary_keys": [{"name": "orders_pkey", "columns": ["id"], "definition": "PRIMARY KEY (id)"}],
                "unique_constraints": [],
                "foreign_keys": [{
                    "name": "orders_customer_id_fkey", "columns": ["customer_id"],
                    "referenced_schema": "shop", "referenced_table": "customers",
                    "referenced_columns": ["id"], "on_update": "NO ACTION", "on_delete": "NO ACTION",
                    "definition": "FOREIGN KEY (customer_id) REFERENCES shop.customers(id)"
                }],
                "check_constraints": []
            },
            "indexes": [],
            "statistics": {
                "seq_scan": 3, "seq_tup_read": 30, "idx_scan": 0, "idx_tup_fetch": 0,
                "live_tuples": 12, "dead_tuples": 0,
                "last_vacuum": null, "last_autovacuum": "2024-03-01T10:15:30.123456+00:00",
                "last_analyze": null, "last_autoanalyze": null
            }
        })
    }

    #[test]
    fn test_decode_table_detail() {
        let detail: TableDetail = serde_json::from_value(orders_document()).unwrap();

        assert!(detail.found());
        assert_eq!(detail.table.row_count, Some(12));
        assert_eq!(detail.columns.len(), 3);
        assert_eq!(detail.constraints.primary_keys[0].columns, vec!["id"]);
        assert!(detail.column("customer_id").unwrap().is_foreign_key());
        assert!(detail.statistics.last_autovacuum.is_some());
    }

    #[test]
    fn test_ordinal_positions_are_increasing() {
        let detail: TableDetail = serde_json::from_value(orders_document()).unwrap();
        let positions: Vec<i32> = detail.columns.iter().map(|c| c.ordinal_position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_table_document() {
        let detail: TableDetail = serde_json::from_value(json!({
            "table": {
                "schema": null, "name": null, "description": null, "row_count": null,
                "size_bytes": null, "data_bytes": null, "index_bytes": null
            },
            "columns": [],
            "constraints": {
                "primary_keys": [], "unique_constraints": [],
                "foreign_keys": [], "check_constraints": []
            },
            "indexes": [],
            "statistics": {}
        }))
        .unwrap();

        assert!(!detail.found());
        assert!(detail.columns.is_empty());
        assert!(detail.constraints.is_empty());
        assert_eq!(detail.statistics, Statistics::default());
    }
}
