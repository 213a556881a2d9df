//! Typed model of the introspection documents.
//!
//! The catalog queries build JSON with `json_build_object`; these types mirror
//! those documents field for field so they decode with `sqlx::types::Json` and
//! serialize back unchanged. Aggregate arrays carry `#[serde(default)]` so a
//! missing array reads as empty, matching the queries' `COALESCE(.., '[]')`.

mod column;
mod constraint;
mod index;
mod schema;
mod table;
mod view;

pub use column::{Column, ColumnConstraint};
pub use constraint::{
    CheckConstraint, ConstraintKind, ConstraintRef, ForeignKey, KeyConstraint, ReferentialAction,
    TableConstraints,
};
pub use index::{Index, IndexDetail};
pub use schema::{
    DatabaseStructure, Extension, SchemaDetail, SchemaEntry, SchemaInfo, SchemaListing,
    SchemaStructure,
};
pub use table::{RelationSummary, Statistics, TableDetail, TableInfo, TableStructure};
pub use view::{MaterializedViewDetail, MaterializedViewInfo, RelationSize};
