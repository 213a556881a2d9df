//! Catalog introspection operations.

use serde::de::DeserializeOwned;
use sqlx::types::Json;
use sqlx::PgConnection;
use tracing::debug;

use crate::error::Result;
use crate::ident::qualified_name;
use crate::model::{
    DatabaseStructure, MaterializedViewDetail, SchemaDetail, SchemaListing, TableDetail,
};
use crate::queries;

/// How row counts in schema, table and view documents are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowCountMode {
    /// Insert-tuple counters from the statistics collector. Cheap, but drifts
    /// after deletes and is zero until the collector has seen the relation.
    #[default]
    Approximate,
    /// `count(*)` per relation. Scans every counted relation.
    Exact,
}

/// Runs the catalog queries against a caller-supplied connection.
///
/// The introspector holds no connection state; every operation borrows the
/// connection for the duration of its queries only.
#[derive(Debug, Clone, Default)]
pub struct Introspector {
    row_counts: RowCountMode,
}

impl Introspector {
    /// Create an introspector with approximate row counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select how row counts are produced.
    pub fn with_row_counts(mut self, mode: RowCountMode) -> Self {
        self.row_counts = mode;
        self
    }

    /// The configured row count mode.
    pub fn row_counts(&self) -> RowCountMode {
        self.row_counts
    }

    /// Every non-system schema with its tables, columns, foreign keys,
    /// indexes and check constraints.
    pub async fn get_database(&self, conn: &mut PgConnection) -> Result<DatabaseStructure> {
        let database: DatabaseStructure = fetch_document(conn, queries::GET_DATABASE, &[]).await?;
        debug!(
            schemas = database.schemas.len(),
            tables = database.table_count(),
            "introspected database"
        );
        Ok(database)
    }

    /// Names, owners and comments of the non-system schemas.
    pub async fn list_schemas(&self, conn: &mut PgConnection) -> Result<SchemaListing> {
        let listing: SchemaListing = fetch_document(conn, queries::LIST_SCHEMAS, &[]).await?;
        debug!(schemas = listing.schemas.len(), "listed schemas");
        Ok(listing)
    }

    /// Extensions and table/materialized view summaries of one schema.
    ///
    /// An unknown schema yields a document with a null name and empty
    /// arrays; see [`SchemaDetail::found`].
    pub async fn get_schema(&self, conn: &mut PgConnection, schema: &str) -> Result<SchemaDetail> {
        let mut detail: SchemaDetail = fetch_document(conn, queries::GET_SCHEMA, &[schema]).await?;

        if self.row_counts == RowCountMode::Exact && detail.found() {
            for table in &mut detail.tables {
                table.row_count = count_rows(conn, schema, &table.name).await?;
            }
            for view in &mut detail.materialized_views {
                if is_populated(conn, schema, &view.name).await? {
                    view.row_count = count_rows(conn, schema, &view.name).await?;
                }
            }
        }

        debug!(
            schema,
            found = detail.found(),
            tables = detail.tables.len(),
            materialized_views = detail.materialized_views.len(),
            "introspected schema"
        );
        Ok(detail)
    }

    /// Full detail for one table: columns, constraints, indexes and activity
    /// statistics.
    ///
    /// An unknown table yields null table fields and empty arrays; see
    /// [`TableDetail::found`].
    pub async fn get_schema_table(
        &self,
        conn: &mut PgConnection,
        schema: &str,
        table: &str,
    ) -> Result<TableDetail> {
        let mut detail: TableDetail =
            fetch_document(conn, queries::GET_SCHEMA_TABLE, &[schema, table]).await?;

        if self.row_counts == RowCountMode::Exact && detail.found() {
            detail.table.row_count = Some(count_rows(conn, schema, table).await?);
        }

        debug!(
            schema,
            table,
            found = detail.found(),
            columns = detail.columns.len(),
            constraints = detail.constraints.len(),
            indexes = detail.indexes.len(),
            "introspected table"
        );
        Ok(detail)
    }

    /// Full detail for one materialized view: definition, columns, indexes,
    /// size breakdown and statistics.
    ///
    /// An unknown view yields null view fields and empty arrays; see
    /// [`MaterializedViewDetail::found`].
    pub async fn get_schema_view(
        &self,
        conn: &mut PgConnection,
        schema: &str,
        view: &str,
    ) -> Result<MaterializedViewDetail> {
        let mut detail: MaterializedViewDetail =
            fetch_document(conn, queries::GET_SCHEMA_VIEW, &[schema, view]).await?;

        // An unpopulated view cannot be scanned; keep the estimate.
        if self.row_counts == RowCountMode::Exact
            && detail.found()
            && detail.materialized_view.is_populated == Some(true)
        {
            detail.materialized_view.row_count = Some(count_rows(conn, schema, view).await?);
        }

        debug!(
            schema,
            view,
            found = detail.found(),
            columns = detail.columns.len(),
            indexes = detail.indexes.len(),
            "introspected materialized view"
        );
        Ok(detail)
    }
}

/// Run a single-document catalog query and decode its one `json` column.
async fn fetch_document<T>(conn: &mut PgConnection, sql: &str, binds: &[&str]) -> Result<T>
where
    T: DeserializeOwned + Send + Unpin + 'static,
{
    let mut query = sqlx::query_scalar::<_, Json<T>>(sql);
    for value in binds {
        query = query.bind(*value);
    }
    let Json(document) = query.fetch_one(&mut *conn).await?;
    Ok(document)
}

async fn count_rows(conn: &mut PgConnection, schema: &str, relation: &str) -> Result<i64> {
    let sql = format!("SELECT count(*) FROM {}", qualified_name(schema, relation)?);
    let count: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
    Ok(count)
}

async fn is_populated(conn: &mut PgConnection, schema: &str, view: &str) -> Result<bool> {
    let populated: Option<bool> = sqlx::query_scalar(queries::MATVIEW_IS_POPULATED)
        .bind(schema)
        .bind(view)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(populated.unwrap_or(false))
}
