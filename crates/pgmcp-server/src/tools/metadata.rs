//! Result metadata for visualization.
//!
//! Describes the shape of a query's result without returning its rows: each
//! output column's logical type, distinct counts for nominal columns, min/max
//! ranges for temporal columns, the total row count and the grouping keys the
//! planner reports.

use std::time::Duration;

use pgmcp_catalog::quote_identifier;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Column, Connection, Executor, FromRow, PgConnection, Statement, TypeInfo};
use tracing::{debug, warn};

use super::{read_only, strip_statement, subquery};

/// Visualization type of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    Quantitative,
    Temporal,
    Nominal,
}

impl LogicalType {
    /// Map a PostgreSQL type name to its logical type.
    pub fn from_pg_type(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "int" | "int2" | "int4" | "int8" | "float4" | "float8" | "numeric" | "decimal"
            | "double precision" => LogicalType::Quantitative,
            "date" | "timestamp" | "timestamptz" => LogicalType::Temporal,
            _ => LogicalType::Nominal,
        }
    }
}

/// Metadata for one result column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub logical_type: LogicalType,
    /// Distinct values, for nominal columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<i64>,
    /// `[min, max]`, for temporal columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Value>,
}

/// Metadata for a whole query result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetadata {
    pub fields: Vec<FieldMetadata>,
    pub row_count: i64,
    pub group_by: Vec<String>,
}

/// Analyze a query's result shape.
///
/// Only describing the columns is required to succeed; each statistic runs
/// in its own savepoint and is left out when it fails.
pub async fn collect_metadata(
    conn: &mut PgConnection,
    sql: &str,
    statement_timeout: Duration,
) -> Result<QueryMetadata, sqlx::Error> {
    let sql = strip_statement(sql);
    let mut tx = read_only(conn, statement_timeout).await?;

    let columns: Vec<(String, String)> = {
        let statement = (&mut *tx).prepare(sql).await?;
        statement
            .columns()
            .iter()
            .map(|c| (c.name().to_string(), c.type_info().name().to_string()))
            .collect()
    };

    let mut metadata = QueryMetadata::default();
    for (name, type_name) in columns {
        let logical_type = LogicalType::from_pg_type(&type_name);
        let mut field = FieldMetadata {
            name,
            logical_type,
            unique: None,
            range: None,
        };

        if let Ok(column) = quote_identifier(&field.name) {
            match logical_type {
                LogicalType::Nominal => {
                    let stat = format!(
                        "SELECT count(DISTINCT {column}) FROM {}",
                        subquery(sql, "subq")
                    );
                    field.unique = optional_stat::<i64>(&mut tx, &stat).await;
                }
                LogicalType::Temporal => {
                    let stat = format!(
                        "SELECT json_build_array(min({column}), max({column})) FROM {}",
                        subquery(sql, "subq")
                    );
                    field.range = optional_stat::<Json<Value>>(&mut tx, &stat)
                        .await
                        .map(|Json(range)| range);
                }
                LogicalType::Quantitative => {}
            }
        }

        metadata.fields.push(field);
    }

    let count = format!("SELECT count(*) FROM {}", subquery(sql, "subq"));
    match optional_stat::<i64>(&mut tx, &count).await {
        Some(rows) => metadata.row_count = rows,
        None => warn!("row count failed for metadata query"),
    }

    let plan = format!("EXPLAIN (VERBOSE, FORMAT JSON) {sql}");
    if let Some(Json(plan)) = optional_stat::<Json<Value>>(&mut tx, &plan).await {
        metadata.group_by = group_keys(&plan);
    }

    tx.rollback().await?;

    debug!(
        fields = metadata.fields.len(),
        row_count = metadata.row_count,
        group_by = ?metadata.group_by,
        "collected query metadata"
    );
    Ok(metadata)
}

/// Run a single-value statistic inside a savepoint, discarding failures.
async fn optional_stat<T>(conn: &mut PgConnection, sql: &str) -> Option<T>
where
    T: Send + Unpin,
    (T,): for<'r> FromRow<'r, PgRow>,
{
    let mut savepoint = conn.begin().await.ok()?;
    match sqlx::query_scalar::<_, T>(sql)
        .fetch_one(&mut *savepoint)
        .await
    {
        Ok(value) => {
            savepoint.commit().await.ok()?;
            Some(value)
        }
        Err(err) => {
            debug!(error = %err, "metadata statistic failed");
            let _ = savepoint.rollback().await;
            None
        }
    }
}

/// Extract the grouping keys from an `EXPLAIN (VERBOSE, FORMAT JSON)` plan.
///
/// Qualified column references are reduced to the bare column name;
/// expressions are kept as the planner prints them. Keys are deduplicated in
/// plan order.
pub fn group_keys(plan: &Value) -> Vec<String> {
    let mut keys = Vec::new();
    collect_group_keys(plan, &mut keys);
    keys
}

fn collect_group_keys(node: &Value, keys: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (field, value) in map {
                if field == "Group Key" || field == "Group Keys" {
                    push_keys(value, keys);
                } else {
                    collect_group_keys(value, keys);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_group_keys(item, keys);
            }
        }
        _ => {}
    }
}

fn push_keys(value: &Value, keys: &mut Vec<String>) {
    match value {
        Value::String(key) => {
            let key = unqualify(key);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Value::Array(items) => {
            for item in items {
                push_keys(item, keys);
            }
        }
        _ => {}
    }
}

/// `orders.customer_id` -> `customer_id`; `"Order Items"."Qty"` -> `Qty`.
fn unqualify(key: &str) -> String {
    let is_reference = key
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '"' || c == ' ' || c == '$');
    if !is_reference {
        return key.to_string();
    }
    let last = split_qualified(key).pop().unwrap_or_default();
    last.trim_matches('"').replace("\"\"", "\"")
}

/// Split on dots outside double quotes.
fn split_qualified(key: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in key.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            '.' if !quoted => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}
