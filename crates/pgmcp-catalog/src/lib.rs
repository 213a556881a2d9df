//! PostgreSQL catalog introspection for pgmcp.
//!
//! This crate holds the SQL query set that turns PostgreSQL system catalogs
//! into nested JSON documents, together with the typed model those documents
//! decode into:
//!
//! - [`Introspector::get_database`]: every non-system schema with its tables,
//!   columns, foreign keys, indexes and check constraints
//! - [`Introspector::list_schemas`]: the non-system schema names
//! - [`Introspector::get_schema`]: one schema's extensions and table/view summaries
//! - [`Introspector::get_schema_table`]: full detail for a single table
//! - [`Introspector::get_schema_view`]: full detail for a single materialized view
//!
//! Every operation is a read against a caller-supplied connection. Unknown
//! schema, table or view names are not errors: the returned document has null
//! names and empty arrays, and each detail type exposes a `found()` helper for
//! callers that want to treat that as "not found".
//!
//! Row counts come from the statistics collector's insert counters and are
//! approximate unless [`RowCountMode::Exact`] is selected.

pub mod error;
pub mod ident;
pub mod introspector;
pub mod model;
pub mod queries;

pub use error::{Error, Result};
pub use ident::{qualified_name, quote_identifier};
pub use introspector::{Introspector, RowCountMode};
pub use model::{
    CheckConstraint, Column, ColumnConstraint, ConstraintKind, ConstraintRef, DatabaseStructure,
    Extension, ForeignKey, Index, IndexDetail, KeyConstraint, MaterializedViewDetail,
    MaterializedViewInfo, ReferentialAction, RelationSize, RelationSummary, SchemaDetail,
    SchemaEntry, SchemaInfo, SchemaListing, SchemaStructure, Statistics, TableConstraints,
    TableDetail, TableInfo, TableStructure,
};
