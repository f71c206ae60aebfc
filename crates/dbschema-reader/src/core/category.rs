//! Metadata categories and their canonical column layouts.
//!
//! Every backend must produce exactly these columns, in this order, for a
//! category. Column names are plain lowercase identifiers so consumers can
//! address them without knowing which engine produced the rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical column names shared by all categories.
pub mod col {
    pub const TABLE_SCHEMA: &str = "table_schema";
    pub const TABLE_NAME: &str = "table_name";
    pub const TABLE_TYPE: &str = "table_type";
    pub const COLUMN_NAME: &str = "column_name";
    pub const ORDINAL_POSITION: &str = "ordinal_position";
    pub const DATA_TYPE: &str = "data_type";
    pub const MAX_LENGTH: &str = "max_length";
    pub const PRECISION: &str = "precision";
    pub const SCALE: &str = "scale";
    pub const IS_NULLABLE: &str = "is_nullable";
    pub const COLUMN_DEFAULT: &str = "column_default";
    pub const CONSTRAINT_SCHEMA: &str = "constraint_schema";
    pub const CONSTRAINT_NAME: &str = "constraint_name";
    pub const REFERENCED_CONSTRAINT_SCHEMA: &str = "referenced_constraint_schema";
    pub const REFERENCED_CONSTRAINT_NAME: &str = "referenced_constraint_name";
    pub const REFERENCED_TABLE_SCHEMA: &str = "referenced_table_schema";
    pub const REFERENCED_TABLE_NAME: &str = "referenced_table_name";
    pub const REFERENCED_COLUMN_NAME: &str = "referenced_column_name";
    pub const DELETE_RULE: &str = "delete_rule";
    pub const UPDATE_RULE: &str = "update_rule";
    pub const CHECK_CLAUSE: &str = "check_clause";
    pub const SEQUENCE_SCHEMA: &str = "sequence_schema";
    pub const SEQUENCE_NAME: &str = "sequence_name";
    pub const INCREMENT_BY: &str = "increment_by";
    pub const MIN_VALUE: &str = "min_value";
    pub const MAX_VALUE: &str = "max_value";
    pub const INDEX_SCHEMA: &str = "index_schema";
    pub const INDEX_NAME: &str = "index_name";
    pub const IS_UNIQUE: &str = "is_unique";
    pub const INDEX_TYPE: &str = "index_type";
    pub const IS_DESCENDING: &str = "is_descending";
    pub const VIEW_SCHEMA: &str = "view_schema";
    pub const VIEW_NAME: &str = "view_name";
    pub const DEFINITION: &str = "definition";
    pub const TRIGGER_SCHEMA: &str = "trigger_schema";
    pub const TRIGGER_NAME: &str = "trigger_name";
    pub const TRIGGERING_EVENT: &str = "triggering_event";
    pub const TRIGGER_TIMING: &str = "trigger_timing";
    pub const TRIGGER_BODY: &str = "trigger_body";
    pub const DESCRIPTION: &str = "description";
}

/// Kind of metadata requested from a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataCategory {
    Tables,
    Columns,
    PrimaryKeys,
    UniqueKeys,
    ForeignKeys,
    CheckConstraints,
    Sequences,
    IdentityColumns,
    Indexes,
    IndexColumns,
    Views,
    ViewColumns,
    Triggers,
    TableDescriptions,
    ColumnDescriptions,
}

impl MetadataCategory {
    /// Every category, in a stable order.
    pub const ALL: [MetadataCategory; 15] = [
        MetadataCategory::Tables,
        MetadataCategory::Columns,
        MetadataCategory::PrimaryKeys,
        MetadataCategory::UniqueKeys,
        MetadataCategory::ForeignKeys,
        MetadataCategory::CheckConstraints,
        MetadataCategory::Sequences,
        MetadataCategory::IdentityColumns,
        MetadataCategory::Indexes,
        MetadataCategory::IndexColumns,
        MetadataCategory::Views,
        MetadataCategory::ViewColumns,
        MetadataCategory::Triggers,
        MetadataCategory::TableDescriptions,
        MetadataCategory::ColumnDescriptions,
    ];

    /// Snake-case identifier, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataCategory::Tables => "tables",
            MetadataCategory::Columns => "columns",
            MetadataCategory::PrimaryKeys => "primary_keys",
            MetadataCategory::UniqueKeys => "unique_keys",
            MetadataCategory::ForeignKeys => "foreign_keys",
            MetadataCategory::CheckConstraints => "check_constraints",
            MetadataCategory::Sequences => "sequences",
            MetadataCategory::IdentityColumns => "identity_columns",
            MetadataCategory::Indexes => "indexes",
            MetadataCategory::IndexColumns => "index_columns",
            MetadataCategory::Views => "views",
            MetadataCategory::ViewColumns => "view_columns",
            MetadataCategory::Triggers => "triggers",
            MetadataCategory::TableDescriptions => "table_descriptions",
            MetadataCategory::ColumnDescriptions => "column_descriptions",
        }
    }

    /// The fixed column layout every backend produces for this category.
    pub fn canonical_schema(&self) -> &'static CanonicalSchema {
        match self {
            MetadataCategory::Tables => &TABLES,
            MetadataCategory::Columns => &COLUMNS,
            MetadataCategory::PrimaryKeys => &PRIMARY_KEYS,
            MetadataCategory::UniqueKeys => &UNIQUE_KEYS,
            MetadataCategory::ForeignKeys => &FOREIGN_KEYS,
            MetadataCategory::CheckConstraints => &CHECK_CONSTRAINTS,
            MetadataCategory::Sequences => &SEQUENCES,
            MetadataCategory::IdentityColumns => &IDENTITY_COLUMNS,
            MetadataCategory::Indexes => &INDEXES,
            MetadataCategory::IndexColumns => &INDEX_COLUMNS,
            MetadataCategory::Views => &VIEWS,
            MetadataCategory::ViewColumns => &VIEW_COLUMNS,
            MetadataCategory::Triggers => &TRIGGERS,
            MetadataCategory::TableDescriptions => &TABLE_DESCRIPTIONS,
            MetadataCategory::ColumnDescriptions => &COLUMN_DESCRIPTIONS,
        }
    }
}

impl fmt::Display for MetadataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataCategory {
    type Err = String;

    /// Accepts `primary_keys`, `primary-keys` and `PrimaryKeys`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        MetadataCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().replace('_', "") == wanted)
            .ok_or_else(|| format!("unknown metadata category '{}'", s))
    }
}

/// Canonical value type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Int,
    /// Exact number; see [`Value::Wide`](super::Value::Wide) for values
    /// beyond `Decimal` range.
    Numeric,
    Bool,
}

/// One column of a canonical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanonicalColumn {
    pub name: &'static str,
    pub kind: ValueKind,
}

const fn text(name: &'static str) -> CanonicalColumn {
    CanonicalColumn {
        name,
        kind: ValueKind::Text,
    }
}

const fn int(name: &'static str) -> CanonicalColumn {
    CanonicalColumn {
        name,
        kind: ValueKind::Int,
    }
}

const fn numeric(name: &'static str) -> CanonicalColumn {
    CanonicalColumn {
        name,
        kind: ValueKind::Numeric,
    }
}

const fn boolean(name: &'static str) -> CanonicalColumn {
    CanonicalColumn {
        name,
        kind: ValueKind::Bool,
    }
}

/// Fixed column layout of a category.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct CanonicalSchema {
    pub category: MetadataCategory,
    pub columns: &'static [CanonicalColumn],
}

impl CanonicalSchema {
    /// Position of a column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

use col::*;

static TABLES: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::Tables,
    columns: &[text(TABLE_SCHEMA), text(TABLE_NAME), text(TABLE_TYPE)],
};

static COLUMNS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::Columns,
    columns: &[
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        text(COLUMN_NAME),
        int(ORDINAL_POSITION),
        text(DATA_TYPE),
        int(MAX_LENGTH),
        int(PRECISION),
        int(SCALE),
        boolean(IS_NULLABLE),
        text(COLUMN_DEFAULT),
    ],
};

const KEY_COLUMNS: &[CanonicalColumn] = &[
    text(CONSTRAINT_SCHEMA),
    text(CONSTRAINT_NAME),
    text(TABLE_SCHEMA),
    text(TABLE_NAME),
    text(COLUMN_NAME),
    int(ORDINAL_POSITION),
];

static PRIMARY_KEYS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::PrimaryKeys,
    columns: KEY_COLUMNS,
};

static UNIQUE_KEYS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::UniqueKeys,
    columns: KEY_COLUMNS,
};

static FOREIGN_KEYS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::ForeignKeys,
    columns: &[
        text(CONSTRAINT_SCHEMA),
        text(CONSTRAINT_NAME),
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        text(COLUMN_NAME),
        int(ORDINAL_POSITION),
        text(REFERENCED_CONSTRAINT_SCHEMA),
        text(REFERENCED_CONSTRAINT_NAME),
        text(REFERENCED_TABLE_SCHEMA),
        text(REFERENCED_TABLE_NAME),
        text(REFERENCED_COLUMN_NAME),
        text(DELETE_RULE),
        text(UPDATE_RULE),
    ],
};

static CHECK_CONSTRAINTS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::CheckConstraints,
    columns: &[
        text(CONSTRAINT_SCHEMA),
        text(CONSTRAINT_NAME),
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        text(CHECK_CLAUSE),
    ],
};

static SEQUENCES: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::Sequences,
    columns: &[
        text(SEQUENCE_SCHEMA),
        text(SEQUENCE_NAME),
        numeric(INCREMENT_BY),
        numeric(MIN_VALUE),
        numeric(MAX_VALUE),
    ],
};

static IDENTITY_COLUMNS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::IdentityColumns,
    columns: &[text(TABLE_SCHEMA), text(TABLE_NAME), text(COLUMN_NAME)],
};

static INDEXES: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::Indexes,
    columns: &[
        text(INDEX_SCHEMA),
        text(INDEX_NAME),
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        boolean(IS_UNIQUE),
        text(INDEX_TYPE),
    ],
};

static INDEX_COLUMNS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::IndexColumns,
    columns: &[
        text(INDEX_SCHEMA),
        text(INDEX_NAME),
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        text(COLUMN_NAME),
        int(ORDINAL_POSITION),
        boolean(IS_DESCENDING),
    ],
};

static VIEWS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::Views,
    columns: &[text(VIEW_SCHEMA), text(VIEW_NAME), text(DEFINITION)],
};

static VIEW_COLUMNS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::ViewColumns,
    columns: &[
        text(VIEW_SCHEMA),
        text(VIEW_NAME),
        text(COLUMN_NAME),
        int(ORDINAL_POSITION),
        text(DATA_TYPE),
    ],
};

static TRIGGERS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::Triggers,
    columns: &[
        text(TRIGGER_SCHEMA),
        text(TRIGGER_NAME),
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        text(TRIGGERING_EVENT),
        text(TRIGGER_TIMING),
        text(TRIGGER_BODY),
    ],
};

static TABLE_DESCRIPTIONS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::TableDescriptions,
    columns: &[text(TABLE_SCHEMA), text(TABLE_NAME), text(DESCRIPTION)],
};

static COLUMN_DESCRIPTIONS: CanonicalSchema = CanonicalSchema {
    category: MetadataCategory::ColumnDescriptions,
    columns: &[
        text(TABLE_SCHEMA),
        text(TABLE_NAME),
        text(COLUMN_NAME),
        text(DESCRIPTION),
    ],
};
