//! pg_catalog query templates for PostgreSQL.
//!
//! PostgreSQL's INFORMATION_SCHEMA hides constraints on tables the login
//! role does not own and reports NOT NULL as check constraints, so keys,
//! checks, and everything without an ANSI view read pg_catalog directly.

use crate::core::col::*;
use crate::core::traits::{BackendReader, CategorySupport, Dialect};
use crate::core::{ConstraintNaming, MetadataCategory};
use crate::drivers::generic::KEY_COLUMN_MAP;
use crate::query::{ColumnMap, QueryTemplate};

use super::dialect::PostgresDialect;

/// pg_class.relkind codes for relations the reader reports.
const RELKINDS: &[(&str, &str)] = &[
    ("r", "TABLE"),
    ("p", "TABLE"),
    ("v", "VIEW"),
    ("m", "MATERIALIZED VIEW"),
    ("f", "FOREIGN TABLE"),
];

/// pg_constraint.confdeltype / confupdtype codes.
const RULE_CODES: &[(&str, &str)] = &[
    ("a", "NO ACTION"),
    ("r", "RESTRICT"),
    ("c", "CASCADE"),
    ("n", "SET NULL"),
    ("d", "SET DEFAULT"),
];

static TABLES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Tables,
    sql: "SELECT n.nspname AS table_schema, c.relname AS table_name, c.relkind::text AS table_type
FROM pg_catalog.pg_class c
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE c.relkind IN ('r', 'p', 'v', 'm', 'f')
    AND n.nspname NOT IN ('pg_catalog', 'information_schema')
    AND n.nspname NOT LIKE 'pg\\_toast%'
    AND {scope}
ORDER BY n.nspname, c.relname",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(TABLE_TYPE).decoded(RELKINDS),
    ],
};

static PRIMARY_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::PrimaryKeys,
    sql: "SELECT n.nspname AS constraint_schema, con.conname AS constraint_name,
    n.nspname AS table_schema, c.relname AS table_name,
    a.attname AS column_name, k.ordinality AS ordinal_position
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = con.connamespace
CROSS JOIN LATERAL unnest(con.conkey) WITH ORDINALITY AS k(attnum, ordinality)
JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
WHERE con.contype = 'p'
    AND {scope}
ORDER BY n.nspname, c.relname, con.conname, k.ordinality",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: KEY_COLUMN_MAP,
};

static UNIQUE_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::UniqueKeys,
    sql: "SELECT n.nspname AS constraint_schema, con.conname AS constraint_name,
    n.nspname AS table_schema, c.relname AS table_name,
    a.attname AS column_name, k.ordinality AS ordinal_position
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = con.connamespace
CROSS JOIN LATERAL unnest(con.conkey) WITH ORDINALITY AS k(attnum, ordinality)
JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
WHERE con.contype = 'u'
    AND {scope}
ORDER BY n.nspname, c.relname, con.conname, k.ordinality",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: KEY_COLUMN_MAP,
};

// conkey and confkey are parallel arrays. The referenced constraint is the
// key constraint owning the index the foreign key depends on; a foreign key
// built on a bare unique index has none and reaches the assembler as NULL.
static FOREIGN_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ForeignKeys,
    sql: "SELECT n.nspname AS constraint_schema, con.conname AS constraint_name,
    n.nspname AS table_schema, c.relname AS table_name,
    a.attname AS column_name, k.ordinality AS ordinal_position,
    rn.nspname AS referenced_constraint_schema, ref.conname AS referenced_constraint_name,
    fn.nspname AS referenced_table_schema, f.relname AS referenced_table_name,
    fa.attname AS referenced_column_name,
    con.confdeltype::text AS delete_rule, con.confupdtype::text AS update_rule
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = con.connamespace
CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(attnum, refnum, ordinality)
JOIN pg_catalog.pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
LEFT JOIN pg_catalog.pg_class f ON f.oid = con.confrelid
LEFT JOIN pg_catalog.pg_namespace fn ON fn.oid = f.relnamespace
LEFT JOIN pg_catalog.pg_attribute fa ON fa.attrelid = con.confrelid AND fa.attnum = k.refnum
LEFT JOIN pg_catalog.pg_constraint ref
    ON ref.conindid = con.conindid
    AND ref.conrelid = con.confrelid
    AND ref.contype IN ('p', 'u')
LEFT JOIN pg_catalog.pg_namespace rn ON rn.oid = ref.connamespace
WHERE con.contype = 'f'
    AND {scope}
ORDER BY n.nspname, c.relname, con.conname, k.ordinality",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(CONSTRAINT_SCHEMA),
        ColumnMap::same(CONSTRAINT_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::same(REFERENCED_CONSTRAINT_SCHEMA),
        ColumnMap::same(REFERENCED_CONSTRAINT_NAME),
        ColumnMap::same(REFERENCED_TABLE_SCHEMA),
        ColumnMap::same(REFERENCED_TABLE_NAME),
        ColumnMap::same(REFERENCED_COLUMN_NAME),
        ColumnMap::same(DELETE_RULE).decoded(RULE_CODES),
        ColumnMap::same(UPDATE_RULE).decoded(RULE_CODES),
    ],
};

static CHECK_CONSTRAINTS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::CheckConstraints,
    sql: "SELECT n.nspname AS constraint_schema, con.conname AS constraint_name,
    n.nspname AS table_schema, c.relname AS table_name,
    pg_catalog.pg_get_constraintdef(con.oid, true) AS check_clause
FROM pg_catalog.pg_constraint con
JOIN pg_catalog.pg_class c ON c.oid = con.conrelid
JOIN pg_catalog.pg_namespace n ON n.oid = con.connamespace
WHERE con.contype = 'c'
    AND {scope}
ORDER BY n.nspname, c.relname, con.conname",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(CONSTRAINT_SCHEMA),
        ColumnMap::same(CONSTRAINT_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(CHECK_CLAUSE),
    ],
};

static SEQUENCES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Sequences,
    sql: "SELECT schemaname, sequencename, increment_by, min_value, max_value
FROM pg_catalog.pg_sequences
WHERE {scope}
ORDER BY schemaname, sequencename",
    table_column: None,
    schema_column: Some("schemaname"),
    columns: &[
        ColumnMap::named(SEQUENCE_SCHEMA, "schemaname"),
        ColumnMap::named(SEQUENCE_NAME, "sequencename"),
        ColumnMap::same(INCREMENT_BY),
        ColumnMap::same(MIN_VALUE),
        ColumnMap::same(MAX_VALUE),
    ],
};

// attidentity: 'a' = GENERATED ALWAYS, 'd' = GENERATED BY DEFAULT.
static IDENTITY_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IdentityColumns,
    sql: "SELECT n.nspname AS table_schema, c.relname AS table_name, a.attname AS column_name
FROM pg_catalog.pg_attribute a
JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE a.attidentity IN ('a', 'd')
    AND NOT a.attisdropped
    AND {scope}
ORDER BY n.nspname, c.relname, a.attnum",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
    ],
};

static INDEXES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Indexes,
    sql: "SELECT n.nspname AS index_schema, i.relname AS index_name,
    n.nspname AS table_schema, c.relname AS table_name,
    x.indisunique AS is_unique, am.amname::text AS index_type
FROM pg_catalog.pg_index x
JOIN pg_catalog.pg_class i ON i.oid = x.indexrelid
JOIN pg_catalog.pg_class c ON c.oid = x.indrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
JOIN pg_catalog.pg_am am ON am.oid = i.relam
WHERE n.nspname NOT IN ('pg_catalog', 'information_schema')
    AND n.nspname NOT LIKE 'pg\\_toast%'
    AND {scope}
ORDER BY n.nspname, i.relname",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(IS_UNIQUE),
        ColumnMap::same(INDEX_TYPE),
    ],
};

// Key columns only (INCLUDE columns sit past indnkeyatts). Expression
// columns have attnum 0 and drop out of the attribute join. Bit 0 of
// indoption marks a descending column.
static INDEX_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IndexColumns,
    sql: "SELECT n.nspname AS index_schema, i.relname AS index_name,
    n.nspname AS table_schema, c.relname AS table_name,
    a.attname AS column_name, k.ordinality AS ordinal_position,
    (x.indoption[(k.ordinality - 1)::int]::int & 1) = 1 AS is_descending
FROM pg_catalog.pg_index x
JOIN pg_catalog.pg_class i ON i.oid = x.indexrelid
JOIN pg_catalog.pg_class c ON c.oid = x.indrelid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
CROSS JOIN LATERAL unnest(x.indkey::int2[]) WITH ORDINALITY AS k(attnum, ordinality)
JOIN pg_catalog.pg_attribute a ON a.attrelid = x.indrelid AND a.attnum = k.attnum
WHERE k.ordinality <= x.indnkeyatts
    AND n.nspname NOT IN ('pg_catalog', 'information_schema')
    AND n.nspname NOT LIKE 'pg\\_toast%'
    AND {scope}
ORDER BY n.nspname, i.relname, k.ordinality",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::same(IS_DESCENDING),
    ],
};

static VIEWS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Views,
    sql: "SELECT schemaname, viewname, definition
FROM pg_catalog.pg_views
WHERE schemaname NOT IN ('pg_catalog', 'information_schema')
    AND {scope}
ORDER BY schemaname, viewname",
    table_column: Some("viewname"),
    schema_column: Some("schemaname"),
    columns: &[
        ColumnMap::named(VIEW_SCHEMA, "schemaname"),
        ColumnMap::named(VIEW_NAME, "viewname"),
        ColumnMap::same(DEFINITION),
    ],
};

static TABLE_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::TableDescriptions,
    sql: "SELECT n.nspname AS table_schema, c.relname AS table_name, d.description
FROM pg_catalog.pg_description d
JOIN pg_catalog.pg_class c
    ON c.oid = d.objoid
    AND d.classoid = 'pg_catalog.pg_class'::regclass
    AND d.objsubid = 0
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE c.relkind IN ('r', 'p', 'v', 'm', 'f')
    AND {scope}
ORDER BY n.nspname, c.relname",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(DESCRIPTION),
    ],
};

static COLUMN_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ColumnDescriptions,
    sql: "SELECT n.nspname AS table_schema, c.relname AS table_name, a.attname AS column_name,
    d.description
FROM pg_catalog.pg_description d
JOIN pg_catalog.pg_class c
    ON c.oid = d.objoid
    AND d.classoid = 'pg_catalog.pg_class'::regclass
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid AND a.attnum = d.objsubid
JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
WHERE d.objsubid > 0
    AND {scope}
ORDER BY n.nspname, c.relname, a.attnum",
    table_column: Some("c.relname"),
    schema_column: Some("n.nspname"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(DESCRIPTION),
    ],
};

/// PostgreSQL backend.
///
/// Constraint names are unique per table, not per schema.
#[derive(Debug, Clone, Default)]
pub struct PostgresBackend {
    dialect: PostgresDialect,
}

impl PostgresBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackendReader for PostgresBackend {
    fn engine(&self) -> &str {
        "postgres"
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn support(&self, category: MetadataCategory) -> CategorySupport {
        match category {
            MetadataCategory::Tables => CategorySupport::Native(&TABLES),
            MetadataCategory::PrimaryKeys => CategorySupport::Native(&PRIMARY_KEYS),
            MetadataCategory::UniqueKeys => CategorySupport::Native(&UNIQUE_KEYS),
            MetadataCategory::ForeignKeys => CategorySupport::Native(&FOREIGN_KEYS),
            MetadataCategory::CheckConstraints => CategorySupport::Native(&CHECK_CONSTRAINTS),
            MetadataCategory::Sequences => CategorySupport::Native(&SEQUENCES),
            MetadataCategory::IdentityColumns => CategorySupport::Native(&IDENTITY_COLUMNS),
            MetadataCategory::Indexes => CategorySupport::Native(&INDEXES),
            MetadataCategory::IndexColumns => CategorySupport::Native(&INDEX_COLUMNS),
            MetadataCategory::Views => CategorySupport::Native(&VIEWS),
            MetadataCategory::TableDescriptions => CategorySupport::Native(&TABLE_DESCRIPTIONS),
            MetadataCategory::ColumnDescriptions => {
                CategorySupport::Native(&COLUMN_DESCRIPTIONS)
            }
            MetadataCategory::Columns
            | MetadataCategory::ViewColumns
            | MetadataCategory::Triggers => CategorySupport::Generic,
        }
    }

    fn constraint_naming(&self) -> ConstraintNaming {
        ConstraintNaming::Table
    }
}
