//! Query tool endpoints.

use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::json::{MetadataRequest, QueryRequest};
use crate::tools::{self, QueryMetadata};
use crate::AppState;

/// Tool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools/pg_query", post(pg_query))
        .route("/tools/pg_explain", post(pg_explain))
        .route("/tools/pg_metadata", post(pg_metadata))
}

fn require_sql(sql: &str) -> Result<()> {
    if tools::strip_statement(sql).is_empty() {
        return Err(AppError::InvalidRequest("query must not be empty".to_string()));
    }
    Ok(())
}

/// Run a read-only query and return its rows.
async fn pg_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Value>> {
    require_sql(&request.query)?;
    let mut conn = state.registry.get(&request.conn_id)?.acquire().await?;
    debug!(conn_id = %request.conn_id, "pg_query");

    let rows = tools::run_query(
        &mut conn,
        &request.query,
        &request.params,
        state.config.statement_timeout,
    )
    .await
    .map_err(AppError::from_query)?;
    Ok(Json(rows))
}

/// Return the planner's JSON plan for a query.
async fn pg_explain(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Value>> {
    require_sql(&request.query)?;
    let mut conn = state.registry.get(&request.conn_id)?.acquire().await?;
    debug!(conn_id = %request.conn_id, "pg_explain");

    let plan = tools::explain(
        &mut conn,
        &request.query,
        &request.params,
        state.config.statement_timeout,
    )
    .await
    .map_err(AppError::from_query)?;
    Ok(Json(plan))
}

/// Describe a query's result for visualization.
async fn pg_metadata(
    State(state): State<AppState>,
    Json(request): Json<MetadataRequest>,
) -> Result<Json<QueryMetadata>> {
    require_sql(&request.sql_query)?;
    let mut conn = state.registry.get(&request.conn_id)?.acquire().await?;
    debug!(conn_id = %request.conn_id, "pg_metadata");

    let metadata =
        tools::collect_metadata(&mut conn, &request.sql_query, state.config.statement_timeout)
            .await
            .map_err(AppError::from_query)?;
    Ok(Json(metadata))
}
