//! Catalog query text.
//!
//! Each statement returns exactly one row with one `json` column holding the
//! whole document. Parameters are positional `text` values.

/// All non-system schemas with their full table structure. No parameters.
pub const GET_DATABASE: &str = include_str!("../sql/get_database.sql");

/// Non-system schema names with owner and comment. No parameters.
pub const LIST_SCHEMAS: &str = include_str!("../sql/list_schemas.sql");

/// One schema's extensions and relation summaries. `$1`: schema.
pub const GET_SCHEMA: &str = include_str!("../sql/get_schema.sql");

/// Full detail for one table. `$1`: schema, `$2`: table.
pub const GET_SCHEMA_TABLE: &str = include_str!("../sql/get_schema_table.sql");

/// Full detail for one materialized view. `$1`: schema, `$2`: view.
pub const GET_SCHEMA_VIEW: &str = include_str!("../sql/get_schema_view.sql");

/// Whether a materialized view can be scanned. `$1`: schema, `$2`: view.
pub(crate) const MATVIEW_IS_POPULATED: &str = "SELECT c.relispopulated \
     FROM pg_catalog.pg_class c \
     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace \
     WHERE n.nspname = $1 AND c.relname = $2 AND c.relkind = 'm'";
