//! INFORMATION_SCHEMA query templates.
//!
//! These are the fallback for every engine that exposes the ANSI views.
//! Backends override a category when their INFORMATION_SCHEMA is missing,
//! incomplete, or ambiguous for it.

use crate::core::col::*;
use crate::core::traits::{BackendReader, CategorySupport, Dialect};
use crate::core::MetadataCategory;
use crate::query::{ColumnMap, QueryTemplate, RULE_WORDS};

use super::dialect::GenericDialect;

/// `TABLE_TYPE` spellings across INFORMATION_SCHEMA implementations.
const TABLE_TYPES: &[(&str, &str)] = &[
    ("BASE TABLE", "TABLE"),
    ("TABLE", "TABLE"),
    ("SYSTEM VERSIONED", "TABLE"),
    ("VIEW", "VIEW"),
    ("SYSTEM VIEW", "VIEW"),
    ("LOCAL TEMPORARY", "TEMPORARY"),
    ("GLOBAL TEMPORARY", "TEMPORARY"),
    ("TEMPORARY", "TEMPORARY"),
    ("FOREIGN", "FOREIGN TABLE"),
    ("FOREIGN TABLE", "FOREIGN TABLE"),
    ("SEQUENCE", "SEQUENCE"),
];

static TABLES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Tables,
    sql: "SELECT t.TABLE_SCHEMA, t.TABLE_NAME, t.TABLE_TYPE
FROM INFORMATION_SCHEMA.TABLES t
WHERE {scope}
ORDER BY t.TABLE_SCHEMA, t.TABLE_NAME",
    table_column: Some("t.TABLE_NAME"),
    schema_column: Some("t.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(TABLE_TYPE).decoded(TABLE_TYPES),
    ],
};

static COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Columns,
    sql: "SELECT c.TABLE_SCHEMA, c.TABLE_NAME, c.COLUMN_NAME, c.ORDINAL_POSITION,
    c.DATA_TYPE, c.CHARACTER_MAXIMUM_LENGTH, c.NUMERIC_PRECISION, c.NUMERIC_SCALE,
    c.IS_NULLABLE, c.COLUMN_DEFAULT
FROM INFORMATION_SCHEMA.COLUMNS c
WHERE {scope}
ORDER BY c.TABLE_SCHEMA, c.TABLE_NAME, c.ORDINAL_POSITION",
    table_column: Some("c.TABLE_NAME"),
    schema_column: Some("c.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::same(DATA_TYPE),
        ColumnMap::named(MAX_LENGTH, "CHARACTER_MAXIMUM_LENGTH"),
        ColumnMap::named(PRECISION, "NUMERIC_PRECISION"),
        ColumnMap::named(SCALE, "NUMERIC_SCALE"),
        ColumnMap::same(IS_NULLABLE),
        ColumnMap::same(COLUMN_DEFAULT),
    ],
};

/// Shared map for PRIMARY KEY and UNIQUE rows.
pub(crate) const KEY_COLUMN_MAP: &[ColumnMap] = &[
    ColumnMap::same(CONSTRAINT_SCHEMA),
    ColumnMap::same(CONSTRAINT_NAME),
    ColumnMap::same(TABLE_SCHEMA),
    ColumnMap::same(TABLE_NAME),
    ColumnMap::same(COLUMN_NAME),
    ColumnMap::same(ORDINAL_POSITION),
];

static PRIMARY_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::PrimaryKeys,
    sql: "SELECT tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, tc.TABLE_SCHEMA, tc.TABLE_NAME,
    kcu.COLUMN_NAME, kcu.ORDINAL_POSITION
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
    ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
    AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
    AND kcu.TABLE_SCHEMA = tc.TABLE_SCHEMA
    AND kcu.TABLE_NAME = tc.TABLE_NAME
WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
    AND {scope}
ORDER BY tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
    table_column: Some("tc.TABLE_NAME"),
    schema_column: Some("tc.TABLE_SCHEMA"),
    columns: KEY_COLUMN_MAP,
};

static UNIQUE_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::UniqueKeys,
    sql: "SELECT tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, tc.TABLE_SCHEMA, tc.TABLE_NAME,
    kcu.COLUMN_NAME, kcu.ORDINAL_POSITION
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
    ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
    AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
    AND kcu.TABLE_SCHEMA = tc.TABLE_SCHEMA
    AND kcu.TABLE_NAME = tc.TABLE_NAME
WHERE tc.CONSTRAINT_TYPE = 'UNIQUE'
    AND {scope}
ORDER BY tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
    table_column: Some("tc.TABLE_NAME"),
    schema_column: Some("tc.TABLE_SCHEMA"),
    columns: KEY_COLUMN_MAP,
};

/// Shared map for foreign-key rows aliased to canonical names.
pub(crate) const FOREIGN_KEY_COLUMN_MAP: &[ColumnMap] = &[
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
    ColumnMap::same(DELETE_RULE).decoded(RULE_WORDS),
    ColumnMap::same(UPDATE_RULE).decoded(RULE_WORDS),
];

// Referenced columns are matched to the child column by position in the
// unique constraint; LEFT JOINs keep FK rows whose target is missing so the
// assembler can report them.
static FOREIGN_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ForeignKeys,
    sql: "SELECT tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, tc.TABLE_SCHEMA, tc.TABLE_NAME,
    kcu.COLUMN_NAME, kcu.ORDINAL_POSITION,
    rc.UNIQUE_CONSTRAINT_SCHEMA AS REFERENCED_CONSTRAINT_SCHEMA,
    rc.UNIQUE_CONSTRAINT_NAME AS REFERENCED_CONSTRAINT_NAME,
    pk.TABLE_SCHEMA AS REFERENCED_TABLE_SCHEMA,
    pk.TABLE_NAME AS REFERENCED_TABLE_NAME,
    pk.COLUMN_NAME AS REFERENCED_COLUMN_NAME,
    rc.DELETE_RULE, rc.UPDATE_RULE
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
INNER JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
    ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
    AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
    AND kcu.TABLE_SCHEMA = tc.TABLE_SCHEMA
    AND kcu.TABLE_NAME = tc.TABLE_NAME
LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc
    ON rc.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
    AND rc.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE pk
    ON pk.CONSTRAINT_SCHEMA = rc.UNIQUE_CONSTRAINT_SCHEMA
    AND pk.CONSTRAINT_NAME = rc.UNIQUE_CONSTRAINT_NAME
    AND pk.ORDINAL_POSITION = kcu.POSITION_IN_UNIQUE_CONSTRAINT
WHERE tc.CONSTRAINT_TYPE = 'FOREIGN KEY'
    AND {scope}
ORDER BY tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
    table_column: Some("tc.TABLE_NAME"),
    schema_column: Some("tc.TABLE_SCHEMA"),
    columns: FOREIGN_KEY_COLUMN_MAP,
};

static CHECK_CONSTRAINTS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::CheckConstraints,
    sql: "SELECT tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME, tc.TABLE_SCHEMA, tc.TABLE_NAME,
    cc.CHECK_CLAUSE
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
INNER JOIN INFORMATION_SCHEMA.CHECK_CONSTRAINTS cc
    ON cc.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
    AND cc.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
WHERE tc.CONSTRAINT_TYPE = 'CHECK'
    AND {scope}
ORDER BY tc.CONSTRAINT_SCHEMA, tc.CONSTRAINT_NAME",
    table_column: Some("tc.TABLE_NAME"),
    schema_column: Some("tc.TABLE_SCHEMA"),
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
    sql: "SELECT s.SEQUENCE_SCHEMA, s.SEQUENCE_NAME, s.INCREMENT, s.MINIMUM_VALUE, s.MAXIMUM_VALUE
FROM INFORMATION_SCHEMA.SEQUENCES s
WHERE {scope}
ORDER BY s.SEQUENCE_SCHEMA, s.SEQUENCE_NAME",
    table_column: None,
    schema_column: Some("s.SEQUENCE_SCHEMA"),
    columns: &[
        ColumnMap::same(SEQUENCE_SCHEMA),
        ColumnMap::same(SEQUENCE_NAME),
        ColumnMap::named(INCREMENT_BY, "INCREMENT"),
        ColumnMap::named(MIN_VALUE, "MINIMUM_VALUE"),
        ColumnMap::named(MAX_VALUE, "MAXIMUM_VALUE"),
    ],
};

static IDENTITY_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IdentityColumns,
    sql: "SELECT c.TABLE_SCHEMA, c.TABLE_NAME, c.COLUMN_NAME
FROM INFORMATION_SCHEMA.COLUMNS c
WHERE c.IS_IDENTITY = 'YES'
    AND {scope}
ORDER BY c.TABLE_SCHEMA, c.TABLE_NAME, c.ORDINAL_POSITION",
    table_column: Some("c.TABLE_NAME"),
    schema_column: Some("c.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
    ],
};

static VIEWS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Views,
    sql: "SELECT v.TABLE_SCHEMA, v.TABLE_NAME, v.VIEW_DEFINITION
FROM INFORMATION_SCHEMA.VIEWS v
WHERE {scope}
ORDER BY v.TABLE_SCHEMA, v.TABLE_NAME",
    table_column: Some("v.TABLE_NAME"),
    schema_column: Some("v.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::named(VIEW_SCHEMA, "TABLE_SCHEMA"),
        ColumnMap::named(VIEW_NAME, "TABLE_NAME"),
        ColumnMap::named(DEFINITION, "VIEW_DEFINITION"),
    ],
};

static VIEW_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ViewColumns,
    sql: "SELECT c.TABLE_SCHEMA, c.TABLE_NAME, c.COLUMN_NAME, c.ORDINAL_POSITION, c.DATA_TYPE
FROM INFORMATION_SCHEMA.COLUMNS c
INNER JOIN INFORMATION_SCHEMA.VIEWS v
    ON v.TABLE_SCHEMA = c.TABLE_SCHEMA
    AND v.TABLE_NAME = c.TABLE_NAME
WHERE {scope}
ORDER BY c.TABLE_SCHEMA, c.TABLE_NAME, c.ORDINAL_POSITION",
    table_column: Some("c.TABLE_NAME"),
    schema_column: Some("c.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::named(VIEW_SCHEMA, "TABLE_SCHEMA"),
        ColumnMap::named(VIEW_NAME, "TABLE_NAME"),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::same(DATA_TYPE),
    ],
};

static TRIGGERS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Triggers,
    sql: "SELECT tr.TRIGGER_SCHEMA, tr.TRIGGER_NAME, tr.EVENT_OBJECT_SCHEMA, tr.EVENT_OBJECT_TABLE,
    tr.EVENT_MANIPULATION, tr.ACTION_TIMING, tr.ACTION_STATEMENT
FROM INFORMATION_SCHEMA.TRIGGERS tr
WHERE {scope}
ORDER BY tr.TRIGGER_SCHEMA, tr.TRIGGER_NAME",
    table_column: Some("tr.EVENT_OBJECT_TABLE"),
    schema_column: Some("tr.EVENT_OBJECT_SCHEMA"),
    columns: &[
        ColumnMap::same(TRIGGER_SCHEMA),
        ColumnMap::same(TRIGGER_NAME),
        ColumnMap::named(TABLE_SCHEMA, "EVENT_OBJECT_SCHEMA"),
        ColumnMap::named(TABLE_NAME, "EVENT_OBJECT_TABLE"),
        ColumnMap::named(TRIGGERING_EVENT, "EVENT_MANIPULATION"),
        ColumnMap::named(TRIGGER_TIMING, "ACTION_TIMING"),
        ColumnMap::named(TRIGGER_BODY, "ACTION_STATEMENT"),
    ],
};

/// Generic template for a category, if INFORMATION_SCHEMA covers it.
///
/// Indexes and descriptions have no ANSI view.
pub fn generic_template(category: MetadataCategory) -> Option<&'static QueryTemplate> {
    match category {
        MetadataCategory::Tables => Some(&TABLES),
        MetadataCategory::Columns => Some(&COLUMNS),
        MetadataCategory::PrimaryKeys => Some(&PRIMARY_KEYS),
        MetadataCategory::UniqueKeys => Some(&UNIQUE_KEYS),
        MetadataCategory::ForeignKeys => Some(&FOREIGN_KEYS),
        MetadataCategory::CheckConstraints => Some(&CHECK_CONSTRAINTS),
        MetadataCategory::Sequences => Some(&SEQUENCES),
        MetadataCategory::IdentityColumns => Some(&IDENTITY_COLUMNS),
        MetadataCategory::Views => Some(&VIEWS),
        MetadataCategory::ViewColumns => Some(&VIEW_COLUMNS),
        MetadataCategory::Triggers => Some(&TRIGGERS),
        MetadataCategory::Indexes
        | MetadataCategory::IndexColumns
        | MetadataCategory::TableDescriptions
        | MetadataCategory::ColumnDescriptions => None,
    }
}

/// Backend for engines reached only through INFORMATION_SCHEMA.
#[derive(Debug, Clone, Default)]
pub struct GenericBackend {
    dialect: GenericDialect,
}

impl GenericBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackendReader for GenericBackend {
    fn engine(&self) -> &str {
        "generic"
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn support(&self, category: MetadataCategory) -> CategorySupport {
        match generic_template(category) {
            Some(template) => CategorySupport::Native(template),
            None => CategorySupport::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScopeFilter;
    use crate::query::ParameterBinder;

    #[test]
    fn test_foreign_keys_bind_parenthesized_scope() {
        let backend = GenericBackend::new();
        let bound = ParameterBinder::new(backend.dialect())
            .bind(&FOREIGN_KEYS, &ScopeFilter::table("ORDERS").in_schema("SALES"));
        assert!(bound.sql.contains(
            "AND (tc.TABLE_NAME = CAST(? AS VARCHAR(128)) OR CAST(? AS VARCHAR(128)) IS NULL) \
             AND (tc.TABLE_SCHEMA = CAST(? AS VARCHAR(128)) OR CAST(? AS VARCHAR(128)) IS NULL)"
        ));
        assert_eq!(bound.params.len(), 4);
    }

    #[test]
    fn test_indexes_are_unsupported() {
        let backend = GenericBackend::new();
        assert!(matches!(
            backend.support(MetadataCategory::Indexes),
            CategorySupport::Unsupported
        ));
        assert!(matches!(
            backend.support(MetadataCategory::PrimaryKeys),
            CategorySupport::Native(_)
        ));
    }
}
