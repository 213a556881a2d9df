//! Column metadata.

use serde::{Deserialize, Serialize};

/// A column of a table or materialized view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Declared type, as rendered by `format_type` (e.g. `numeric(10,2)`).
    #[serde(rename = "type")]
    pub data_type: String,
    /// Whether the column accepts nulls.
    pub nullable: bool,
    /// Default expression text, if any.
    pub default: Option<String>,
    /// Column comment.
    pub description: Option<String>,
    /// 1-based position among the live (non-dropped) columns.
    pub ordinal_position: i32,
    /// Constraint memberships: one entry per primary/unique constraint
    /// covering the column, plus a single foreign-key tag.
    #[serde(default)]
    pub constraints: Vec<ColumnConstraint>,
    /// Whether this is an identity column.
    #[serde(default)]
    pub is_identity: bool,
    /// `ALWAYS` or `BY DEFAULT` for identity columns.
    pub identity_generation: Option<String>,
    /// `STORED` (or `VIRTUAL`) for generated columns.
    pub generated: Option<String>,
    /// Storage strategy: `plain`, `external`, `extended` or `main`.
    pub storage: Option<String>,
}

impl Column {
    /// Whether the column belongs to a primary key.
    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::PrimaryKey)
    }

    /// Whether the column participates in a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::ForeignKey)
    }

    /// Whether the column belongs to a unique constraint.
    pub fn is_unique(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::Unique)
    }
}

/// Tag naming a kind of key constraint a column takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnConstraint {
    #[serde(rename = "PRIMARY KEY")]
    PrimaryKey,
    #[serde(rename = "UNIQUE")]
    Unique,
    #[serde(rename = "FOREIGN KEY")]
    ForeignKey,
}
