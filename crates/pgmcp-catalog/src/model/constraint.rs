//! Table constraint metadata.

use serde::{Deserialize, Serialize};

/// Kind of a table-level integrity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
}

/// A primary key or unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyConstraint {
    /// Constraint name.
    pub name: String,
    /// Covered columns in key order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Constraint definition as rendered by `pg_get_constraintdef`.
    pub definition: Option<String>,
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns in key order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Schema of the referenced table.
    pub referenced_schema: String,
    /// Referenced table.
    pub referenced_table: String,
    /// Referenced columns, positionally matching `columns`.
    #[serde(default)]
    pub referenced_columns: Vec<String>,
    /// Action taken when the referenced key is updated.
    pub on_update: ReferentialAction,
    /// Action taken when the referenced row is deleted.
    pub on_delete: ReferentialAction,
    /// Constraint definition as rendered by `pg_get_constraintdef`.
    pub definition: Option<String>,
}

/// ON UPDATE / ON DELETE rule of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[serde(rename = "NO ACTION")]
    NoAction,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
}

impl ReferentialAction {
    /// SQL spelling of the action.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// A check constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckConstraint {
    /// Constraint name.
    pub name: String,
    /// Columns referenced by the check expression.
    #[serde(default)]
    pub columns: Vec<String>,
    /// `CHECK (...)` definition.
    pub definition: Option<String>,
}

/// Constraints of a single table, separated by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConstraints {
    #[serde(default)]
    pub primary_keys: Vec<KeyConstraint>,
    #[serde(default)]
    pub unique_constraints: Vec<KeyConstraint>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    pub check_constraints: Vec<CheckConstraint>,
}

impl TableConstraints {
    /// Total number of constraints of every kind.
    pub fn len(&self) -> usize {
        self.primary_keys.len()
            + self.unique_constraints.len()
            + self.foreign_keys.len()
            + self.check_constraints.len()
    }

    /// Whether the table has no constraints at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every constraint regardless of kind.
    pub fn iter(&self) -> impl Iterator<Item = ConstraintRef<'_>> {
        self.primary_keys
            .iter()
            .map(ConstraintRef::PrimaryKey)
            .chain(self.unique_constraints.iter().map(ConstraintRef::Unique))
            .chain(self.foreign_keys.iter().map(ConstraintRef::ForeignKey))
            .chain(self.check_constraints.iter().map(ConstraintRef::Check))
    }

    /// Look up a constraint by name.
    pub fn get(&self, name: &str) -> Option<ConstraintRef<'_>> {
        self.iter().find(|c| c.name() == name)
    }
}

/// Borrowed view of a constraint of any kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintRef<'a> {
    PrimaryKey(&'a KeyConstraint),
    Unique(&'a KeyConstraint),
    ForeignKey(&'a ForeignKey),
    Check(&'a CheckConstraint),
}

impl<'a> ConstraintRef<'a> {
    /// Kind of the constraint.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            ConstraintRef::PrimaryKey(_) => ConstraintKind::PrimaryKey,
            ConstraintRef::Unique(_) => ConstraintKind::Unique,
            ConstraintRef::ForeignKey(_) => ConstraintKind::ForeignKey,
            ConstraintRef::Check(_) => ConstraintKind::Check,
        }
    }

    /// Constraint name.
    pub fn name(&self) -> &'a str {
        match *self {
            ConstraintRef::PrimaryKey(c) | ConstraintRef::Unique(c) => &c.name,
            ConstraintRef::ForeignKey(c) => &c.name,
            ConstraintRef::Check(c) => &c.name,
        }
    }

    /// Covered columns, in the constraint's key order.
    pub fn columns(&self) -> &'a [String] {
        match *self {
            ConstraintRef::PrimaryKey(c) | ConstraintRef::Unique(c) => &c.columns,
            ConstraintRef::ForeignKey(c) => &c.columns,
            ConstraintRef::Check(c) => &c.columns,
        }
    }
}
