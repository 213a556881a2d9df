//! Read-only query and explain tools.

use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryScalar;
use sqlx::types::Json;
use sqlx::{PgConnection, Postgres};
use tracing::debug;

use super::{read_only, strip_statement, subquery};

type JsonQuery<'q> = QueryScalar<'q, Postgres, Json<Value>, PgArguments>;

/// Bind JSON parameters positionally.
///
/// Scalars bind as their natural PostgreSQL types; arrays and objects bind as
/// `json`. Parameters compared against non-text columns may need an explicit
/// cast in the query (`$1::int`).
fn bind_params<'q>(mut query: JsonQuery<'q>, params: &'q [Value]) -> JsonQuery<'q> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::String(s) => query.bind(s.as_str()),
            other => query.bind(Json(other)),
        };
    }
    query
}

/// Run a query and return its rows as a JSON array of objects.
pub async fn run_query(
    conn: &mut PgConnection,
    sql: &str,
    params: &[Value],
    statement_timeout: Duration,
) -> Result<Value, sqlx::Error> {
    let sql = strip_statement(sql);
    let wrapped = format!(
        "SELECT COALESCE(json_agg(q), '[]'::json) FROM {}",
        subquery(sql, "q")
    );

    let mut tx = read_only(conn, statement_timeout).await?;
    let Json(rows) = bind_params(sqlx::query_scalar(&wrapped), params)
        .fetch_one(&mut *tx)
        .await?;
    tx.rollback().await?;

    debug!(
        rows = rows.as_array().map(Vec::len).unwrap_or(0),
        params = params.len(),
        "executed query"
    );
    Ok(rows)
}

/// Return the planner's JSON plan for a query without running it.
pub async fn explain(
    conn: &mut PgConnection,
    sql: &str,
    params: &[Value],
    statement_timeout: Duration,
) -> Result<Value, sqlx::Error> {
    let explain = format!("EXPLAIN (FORMAT JSON) {}", strip_statement(sql));

    let mut tx = read_only(conn, statement_timeout).await?;
    let Json(plan) = bind_params(sqlx::query_scalar(&explain), params)
        .fetch_one(&mut *tx)
        .await?;
    tx.rollback().await?;

    Ok(plan)
}
