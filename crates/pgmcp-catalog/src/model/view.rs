//! Materialized view metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Column, IndexDetail, Statistics};

/// Header of the single-materialized-view document.
///
/// Every field is null when the requested view does not exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterializedViewInfo {
    pub schema: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Defining query as rendered by `pg_get_viewdef`.
    pub definition: Option<String>,
    /// False until the first `REFRESH MATERIALIZED VIEW` of a view created
    /// `WITH NO DATA`.
    pub is_populated: Option<bool>,
    /// Approximate row count from the statistics collector.
    pub row_count: Option<i64>,
    pub size_bytes: Option<i64>,
    /// Latest maintenance timestamp recorded for the view. PostgreSQL keeps no
    /// refresh timestamp, so this approximates the last refresh.
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Size breakdown of a relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationSize {
    /// Data, indexes and TOAST together.
    pub total_bytes: Option<i64>,
    pub data_bytes: Option<i64>,
    pub index_bytes: Option<i64>,
}

/// The single-materialized-view document returned by `get_schema_view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterializedViewDetail {
    pub materialized_view: MaterializedViewInfo,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub indexes: Vec<IndexDetail>,
    #[serde(default)]
    pub size: RelationSize,
    #[serde(default)]
    pub statistics: Statistics,
}

impl MaterializedViewDetail {
    /// Whether the requested materialized view exists.
    pub fn found(&self) -> bool {
        self.materialized_view.name.is_some()
    }
}
