//! Schema and whole-database documents.

use serde::{Deserialize, Serialize};

use super::{RelationSummary, TableStructure};

/// The whole-database document returned by `get_database`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStructure {
    /// Non-system schemas ordered by name.
    #[serde(default)]
    pub schemas: Vec<SchemaStructure>,
}

impl DatabaseStructure {
    /// Look up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&SchemaStructure> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Total number of tables across all schemas.
    pub fn table_count(&self) -> usize {
        self.schemas.iter().map(|s| s.tables.len()).sum()
    }
}

/// A schema with its full table structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaStructure {
    pub name: String,
    pub description: Option<String>,
    /// Tables ordered by name.
    #[serde(default)]
    pub tables: Vec<TableStructure>,
}

impl SchemaStructure {
    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableStructure> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// The document returned by `list_schemas`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaListing {
    #[serde(default)]
    pub schemas: Vec<SchemaEntry>,
}

/// A schema name with its owner and comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub description: Option<String>,
    pub owner: Option<String>,
}

/// Name and comment of a schema. Both are null for an unknown schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// An extension installed into a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
}

/// The single-schema summary returned by `get_schema`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDetail {
    pub schema_info: SchemaInfo,
    #[serde(default)]
    pub extensions: Vec<Extension>,
    /// Tables ordered by name.
    #[serde(default)]
    pub tables: Vec<RelationSummary>,
    /// Materialized views ordered by name.
    #[serde(default)]
    pub materialized_views: Vec<RelationSummary>,
}

impl SchemaDetail {
    /// Whether the requested schema exists.
    pub fn found(&self) -> bool {
        self.schema_info.name.is_some()
    }
}
