//! Descriptor types assembled from canonical rows.
//!
//! Descriptors are read-only snapshots of what the catalog reported at the
//! moment of the call. They are handed to the schema-model builder and
//! never cached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::ExactNumber;

/// One column of a key, with its 1-based position in the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyColumn {
    pub name: String,
    pub ordinal: i64,
}

/// Primary or unique key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    /// Constraint schema name.
    pub schema: String,

    /// Constraint name.
    pub name: String,

    /// Schema of the owning table.
    pub table_schema: String,

    /// Owning table name.
    pub table: String,

    /// Key columns in ascending ordinal order.
    pub columns: Vec<KeyColumn>,
}

impl ConstraintDescriptor {
    /// Key column names in key order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the fully qualified constraint name.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// Namespace in which an engine keeps constraint names unique.
///
/// Constraint rows are grouped by (schema, name). Engines that only keep
/// names unique per table (PostgreSQL foreign keys, MySQL `PRIMARY`) also
/// need the owning table in the group key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintNaming {
    #[default]
    Schema,
    Table,
}

/// Referential action attached to a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
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

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ReferentialAction {
    type Err = String;

    /// Accepts `NO ACTION`, `NO_ACTION`, `no action` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "NO ACTION" => Ok(ReferentialAction::NoAction),
            "RESTRICT" => Ok(ReferentialAction::Restrict),
            "CASCADE" => Ok(ReferentialAction::Cascade),
            "SET NULL" => Ok(ReferentialAction::SetNull),
            "SET DEFAULT" => Ok(ReferentialAction::SetDefault),
            _ => Err(format!("unknown referential action '{}'", s)),
        }
    }
}

/// Foreign key constraint with its resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// The foreign key's own identity and columns.
    #[serde(flatten)]
    pub constraint: ConstraintDescriptor,

    /// Schema of the referenced primary/unique constraint.
    pub referenced_constraint_schema: String,

    /// Name of the referenced primary/unique constraint.
    pub referenced_constraint: String,

    /// Schema of the referenced table.
    pub referenced_table_schema: String,

    /// Referenced (parent) table.
    pub referenced_table: String,

    /// Referenced column names, aligned with `constraint.columns`.
    pub referenced_columns: Vec<String>,

    /// ON DELETE action.
    pub delete_rule: ReferentialAction,

    /// ON UPDATE action.
    pub update_rule: ReferentialAction,
}

/// Sequence generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDescriptor {
    pub schema: String,
    pub name: String,
    pub increment: ExactNumber,
    /// `None` when the engine does not report a bound.
    pub min_value: Option<ExactNumber>,
    pub max_value: Option<ExactNumber>,
}

/// Column whose value the engine generates on insert.
///
/// ALWAYS and BY DEFAULT generation are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityColumnDescriptor {
    pub schema: String,
    pub table: String,
    pub column: String,
}

/// One column of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub name: String,
    pub ordinal: i64,
    pub descending: bool,
}

/// Index with its ordered key columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub schema: String,
    pub name: String,
    pub table_schema: String,
    pub table: String,
    pub is_unique: bool,
    /// Engine-specific access method (btree, CLUSTERED, ...), when reported.
    pub index_type: Option<String>,
    pub columns: Vec<IndexColumn>,
}
