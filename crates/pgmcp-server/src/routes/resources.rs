//! Catalog documents for a registered connection.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use pgmcp_catalog::{
    DatabaseStructure, MaterializedViewDetail, SchemaDetail, SchemaListing, TableDetail,
};

use crate::error::Result;
use crate::AppState;

/// Resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pgmcp/:conn_id/", get(get_database))
        .route("/pgmcp/:conn_id/schemas", get(list_schemas))
        .route("/pgmcp/:conn_id/schemas/:schema", get(get_schema))
        .route(
            "/pgmcp/:conn_id/schemas/:schema/tables/:table",
            get(get_schema_table),
        )
        .route(
            "/pgmcp/:conn_id/schemas/:schema/materialized_views/:view",
            get(get_schema_view),
        )
}

async fn get_database(
    State(state): State<AppState>,
    Path(conn_id): Path<String>,
) -> Result<Json<DatabaseStructure>> {
    let mut conn = state.registry.get(&conn_id)?.acquire().await?;
    let database = state.introspector.get_database(&mut conn).await?;
    Ok(Json(database))
}

async fn list_schemas(
    State(state): State<AppState>,
    Path(conn_id): Path<String>,
) -> Result<Json<SchemaListing>> {
    let mut conn = state.registry.get(&conn_id)?.acquire().await?;
    let listing = state.introspector.list_schemas(&mut conn).await?;
    Ok(Json(listing))
}

async fn get_schema(
    State(state): State<AppState>,
    Path((conn_id, schema)): Path<(String, String)>,
) -> Result<Json<SchemaDetail>> {
    let mut conn = state.registry.get(&conn_id)?.acquire().await?;
    let detail = state.introspector.get_schema(&mut conn, &schema).await?;
    Ok(Json(detail))
}

async fn get_schema_table(
    State(state): State<AppState>,
    Path((conn_id, schema, table)): Path<(String, String, String)>,
) -> Result<Json<TableDetail>> {
    let mut conn = state.registry.get(&conn_id)?.acquire().await?;
    let detail = state
        .introspector
        .get_schema_table(&mut conn, &schema, &table)
        .await?;
    Ok(Json(detail))
}

async fn get_schema_view(
    State(state): State<AppState>,
    Path((conn_id, schema, view)): Path<(String, String, String)>,
) -> Result<Json<MaterializedViewDetail>> {
    let mut conn = state.registry.get(&conn_id)?.acquire().await?;
    let detail = state
        .introspector
        .get_schema_view(&mut conn, &schema, &view)
        .await?;
    Ok(Json(detail))
}
