//! QSYS2 catalog query templates for Db2 for i.
//!
//! Db2 for i has no INFORMATION_SCHEMA; every category reads the QSYS2
//! catalog views. Native aliases (`SCHEMA`, `INCREMENTBY`, `tabschema`)
//! are the names the catalog tooling on this platform has always used and
//! are resolved by the column maps.

use crate::core::col::*;
use crate::core::traits::{BackendReader, CategorySupport, Dialect};
use crate::core::{MetadataCategory, ScopePolicy};
use crate::drivers::generic::KEY_COLUMN_MAP;
use crate::query::{ColumnMap, QueryTemplate, RULE_WORDS};

use super::dialect::Db2ISeriesDialect;

/// SYSTABLES.TABLE_TYPE codes.
const TABLE_TYPES: &[(&str, &str)] = &[
    ("T", "TABLE"),
    ("P", "TABLE"),
    ("V", "VIEW"),
    ("L", "VIEW"),
    ("M", "MATERIALIZED VIEW"),
    ("A", "ALIAS"),
];

/// Trigger event and timing, as codes or words.
const TRIGGER_EVENTS: &[(&str, &str)] = &[
    ("I", "INSERT"),
    ("U", "UPDATE"),
    ("D", "DELETE"),
    ("R", "READ"),
    ("INSERT", "INSERT"),
    ("UPDATE", "UPDATE"),
    ("DELETE", "DELETE"),
    ("READ", "READ"),
];

const TRIGGER_TIMINGS: &[(&str, &str)] = &[
    ("A", "AFTER"),
    ("B", "BEFORE"),
    ("I", "INSTEAD OF"),
    ("AFTER", "AFTER"),
    ("BEFORE", "BEFORE"),
    ("INSTEAD OF", "INSTEAD OF"),
];

static TABLES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Tables,
    sql: "SELECT TABLE_SCHEMA, TABLE_NAME, TABLE_TYPE
FROM QSYS2.SYSTABLES
WHERE {scope}
ORDER BY TABLE_SCHEMA, TABLE_NAME",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(TABLE_TYPE).decoded(TABLE_TYPES),
    ],
};

static COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Columns,
    sql: "SELECT TABLE_SCHEMA, TABLE_NAME, COLUMN_NAME, ORDINAL_POSITION, DATA_TYPE,
    CHARACTER_MAXIMUM_LENGTH, NUMERIC_PRECISION, NUMERIC_SCALE, IS_NULLABLE, COLUMN_DEFAULT
FROM QSYS2.SYSCOLUMNS
WHERE {scope}
ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::same(DATA_TYPE).trimmed(),
        ColumnMap::named(MAX_LENGTH, "CHARACTER_MAXIMUM_LENGTH"),
        ColumnMap::named(PRECISION, "NUMERIC_PRECISION"),
        ColumnMap::named(SCALE, "NUMERIC_SCALE"),
        ColumnMap::same(IS_NULLABLE),
        ColumnMap::same(COLUMN_DEFAULT),
    ],
};

static PRIMARY_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::PrimaryKeys,
    sql: "SELECT cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME,
    cons.TABLE_SCHEMA AS schema_name, cons.TABLE_NAME,
    cols.COLUMN_NAME, cols.ORDINAL_POSITION
FROM QSYS2.SYSCST cons
INNER JOIN QSYS2.SYSKEYCST cols
    ON cons.CONSTRAINT_SCHEMA = cols.CONSTRAINT_SCHEMA
    AND cons.CONSTRAINT_NAME = cols.CONSTRAINT_NAME
    AND cons.TABLE_SCHEMA = cols.TABLE_SCHEMA
    AND cons.TABLE_NAME = cols.TABLE_NAME
WHERE cons.CONSTRAINT_TYPE = 'PRIMARY KEY'
    AND {scope}
ORDER BY cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME, cols.ORDINAL_POSITION",
    table_column: Some("cons.TABLE_NAME"),
    schema_column: Some("cons.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(CONSTRAINT_SCHEMA),
        ColumnMap::same(CONSTRAINT_NAME),
        ColumnMap::named(TABLE_SCHEMA, "schema_name"),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
    ],
};

static UNIQUE_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::UniqueKeys,
    sql: "SELECT cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME, cons.TABLE_SCHEMA, cons.TABLE_NAME,
    cols.COLUMN_NAME, cols.ORDINAL_POSITION
FROM QSYS2.SYSCST cons
INNER JOIN QSYS2.SYSKEYCST cols
    ON cons.CONSTRAINT_SCHEMA = cols.CONSTRAINT_SCHEMA
    AND cons.CONSTRAINT_NAME = cols.CONSTRAINT_NAME
    AND cons.TABLE_SCHEMA = cols.TABLE_SCHEMA
    AND cons.TABLE_NAME = cols.TABLE_NAME
WHERE cons.CONSTRAINT_TYPE = 'UNIQUE'
    AND {scope}
ORDER BY cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME, cols.ORDINAL_POSITION",
    table_column: Some("cons.TABLE_NAME"),
    schema_column: Some("cons.TABLE_SCHEMA"),
    columns: KEY_COLUMN_MAP,
};

// One row per child column: the parent key column is matched on ordinal
// position. SYSREFCST and the parent SYSKEYCST are LEFT JOINed so a
// dangling reference reaches the assembler as NULLs.
static FOREIGN_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ForeignKeys,
    sql: "SELECT cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME,
    cons.TABLE_SCHEMA AS schema_name, cons.TABLE_NAME,
    child.COLUMN_NAME, child.ORDINAL_POSITION,
    refs.UNIQUE_CONSTRAINT_SCHEMA, refs.UNIQUE_CONSTRAINT_NAME,
    parent.TABLE_SCHEMA AS fk_schema, parent.TABLE_NAME AS fk_table,
    parent.COLUMN_NAME AS fk_column,
    refs.DELETE_RULE, refs.UPDATE_RULE
FROM QSYS2.SYSCST cons
INNER JOIN QSYS2.SYSKEYCST child
    ON cons.CONSTRAINT_SCHEMA = child.CONSTRAINT_SCHEMA
    AND cons.CONSTRAINT_NAME = child.CONSTRAINT_NAME
    AND cons.TABLE_SCHEMA = child.TABLE_SCHEMA
    AND cons.TABLE_NAME = child.TABLE_NAME
LEFT JOIN QSYS2.SYSREFCST refs
    ON cons.CONSTRAINT_SCHEMA = refs.CONSTRAINT_SCHEMA
    AND cons.CONSTRAINT_NAME = refs.CONSTRAINT_NAME
LEFT JOIN QSYS2.SYSKEYCST parent
    ON refs.UNIQUE_CONSTRAINT_SCHEMA = parent.CONSTRAINT_SCHEMA
    AND refs.UNIQUE_CONSTRAINT_NAME = parent.CONSTRAINT_NAME
    AND parent.ORDINAL_POSITION = child.ORDINAL_POSITION
WHERE cons.CONSTRAINT_TYPE = 'FOREIGN KEY'
    AND {scope}
ORDER BY cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME, child.ORDINAL_POSITION",
    table_column: Some("cons.TABLE_NAME"),
    schema_column: Some("cons.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(CONSTRAINT_SCHEMA),
        ColumnMap::same(CONSTRAINT_NAME),
        ColumnMap::named(TABLE_SCHEMA, "schema_name"),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::named(REFERENCED_CONSTRAINT_SCHEMA, "UNIQUE_CONSTRAINT_SCHEMA"),
        ColumnMap::named(REFERENCED_CONSTRAINT_NAME, "UNIQUE_CONSTRAINT_NAME"),
        ColumnMap::named(REFERENCED_TABLE_SCHEMA, "fk_schema"),
        ColumnMap::named(REFERENCED_TABLE_NAME, "fk_table"),
        ColumnMap::named(REFERENCED_COLUMN_NAME, "fk_column"),
        ColumnMap::same(DELETE_RULE).decoded(RULE_WORDS),
        ColumnMap::same(UPDATE_RULE).decoded(RULE_WORDS),
    ],
};

static CHECK_CONSTRAINTS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::CheckConstraints,
    sql: "SELECT cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME, cons.TABLE_SCHEMA, cons.TABLE_NAME,
    chk.CHECK_CLAUSE
FROM QSYS2.SYSCST cons
INNER JOIN QSYS2.SYSCHKCST chk
    ON cons.CONSTRAINT_SCHEMA = chk.CONSTRAINT_SCHEMA
    AND cons.CONSTRAINT_NAME = chk.CONSTRAINT_NAME
WHERE cons.CONSTRAINT_TYPE = 'CHECK'
    AND {scope}
ORDER BY cons.CONSTRAINT_SCHEMA, cons.CONSTRAINT_NAME",
    table_column: Some("cons.TABLE_NAME"),
    schema_column: Some("cons.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(CONSTRAINT_SCHEMA),
        ColumnMap::same(CONSTRAINT_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(CHECK_CLAUSE),
    ],
};

// System-owned sequences are excluded even when no scope is given.
// DECIMAL(31,0) sequences have bounds up to 10^31-1, read as text.
static SEQUENCES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Sequences,
    sql: "SELECT SEQUENCE_SCHEMA AS SCHEMA, SEQUENCE_NAME,
    CAST(INCREMENT AS VARCHAR(40)) AS INCREMENTBY,
    CAST(MINIMUM_VALUE AS VARCHAR(40)) AS minvalue,
    CAST(MAXIMUM_VALUE AS VARCHAR(40)) AS maxvalue
FROM QSYS2.SYSSEQUENCES
WHERE SEQUENCE_SCHEMA NOT IN ('SYSIBM', 'QSYS2', 'QSYS', 'SYSTOOLS')
    AND {scope}
ORDER BY SEQUENCE_SCHEMA, SEQUENCE_NAME",
    table_column: None,
    schema_column: Some("SEQUENCE_SCHEMA"),
    columns: &[
        ColumnMap::named(SEQUENCE_SCHEMA, "SCHEMA"),
        ColumnMap::same(SEQUENCE_NAME),
        ColumnMap::named(INCREMENT_BY, "INCREMENTBY"),
        ColumnMap::named(MIN_VALUE, "minvalue"),
        ColumnMap::named(MAX_VALUE, "maxvalue"),
    ],
};

// HAS_DEFAULT: I = GENERATED ALWAYS AS IDENTITY, J = GENERATED BY DEFAULT.
static IDENTITY_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IdentityColumns,
    sql: "SELECT TABLE_SCHEMA AS tabschema, TABLE_NAME AS TableName, COLUMN_NAME AS ColumnName
FROM QSYS2.SYSCOLUMNS
WHERE HAS_DEFAULT IN ('I', 'J')
    AND {scope}
ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::named(TABLE_SCHEMA, "tabschema"),
        ColumnMap::named(TABLE_NAME, "TableName"),
        ColumnMap::named(COLUMN_NAME, "ColumnName"),
    ],
};

static INDEXES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Indexes,
    sql: "SELECT INDEX_SCHEMA, INDEX_NAME, TABLE_SCHEMA, TABLE_NAME, IS_UNIQUE
FROM QSYS2.SYSINDEXES
WHERE {scope}
ORDER BY INDEX_SCHEMA, INDEX_NAME",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        // U = unique, V = unique where not null; D and E allow duplicates.
        ColumnMap::same(IS_UNIQUE).flag(&["U", "V"]),
        ColumnMap::absent(INDEX_TYPE),
    ],
};

static INDEX_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IndexColumns,
    sql: "SELECT k.INDEX_SCHEMA, k.INDEX_NAME, ix.TABLE_SCHEMA, ix.TABLE_NAME,
    k.COLUMN_NAME, k.ORDINAL_POSITION, k.ORDERING
FROM QSYS2.SYSKEYS k
INNER JOIN QSYS2.SYSINDEXES ix
    ON ix.INDEX_SCHEMA = k.INDEX_SCHEMA
    AND ix.INDEX_NAME = k.INDEX_NAME
WHERE {scope}
ORDER BY k.INDEX_SCHEMA, k.INDEX_NAME, k.ORDINAL_POSITION",
    table_column: Some("ix.TABLE_NAME"),
    schema_column: Some("ix.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(ORDINAL_POSITION),
        ColumnMap::named(IS_DESCENDING, "ORDERING").flag(&["D"]),
    ],
};

static VIEWS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Views,
    sql: "SELECT TABLE_SCHEMA, TABLE_NAME, VIEW_DEFINITION
FROM QSYS2.SYSVIEWS
WHERE {scope}
ORDER BY TABLE_SCHEMA, TABLE_NAME",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::named(VIEW_SCHEMA, "TABLE_SCHEMA"),
        ColumnMap::named(VIEW_NAME, "TABLE_NAME"),
        ColumnMap::named(DEFINITION, "VIEW_DEFINITION"),
    ],
};

static VIEW_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ViewColumns,
    sql: "SELECT c.TABLE_SCHEMA, c.TABLE_NAME, c.COLUMN_NAME, c.ORDINAL_POSITION, c.DATA_TYPE
FROM QSYS2.SYSCOLUMNS c
INNER JOIN QSYS2.SYSVIEWS v
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
        ColumnMap::same(DATA_TYPE).trimmed(),
    ],
};

static TRIGGERS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Triggers,
    sql: "SELECT TRIGGER_SCHEMA, TRIGGER_NAME, EVENT_OBJECT_SCHEMA, EVENT_OBJECT_TABLE,
    EVENT_MANIPULATION, ACTION_TIMING, ACTION_STATEMENT
FROM QSYS2.SYSTRIGGERS
WHERE EVENT_OBJECT_SCHEMA <> 'SYSTOOLS'
    AND {scope}
ORDER BY TRIGGER_SCHEMA, TRIGGER_NAME",
    table_column: Some("EVENT_OBJECT_TABLE"),
    schema_column: Some("EVENT_OBJECT_SCHEMA"),
    columns: &[
        ColumnMap::same(TRIGGER_SCHEMA),
        ColumnMap::same(TRIGGER_NAME),
        ColumnMap::named(TABLE_SCHEMA, "EVENT_OBJECT_SCHEMA"),
        ColumnMap::named(TABLE_NAME, "EVENT_OBJECT_TABLE"),
        ColumnMap::named(TRIGGERING_EVENT, "EVENT_MANIPULATION").decoded(TRIGGER_EVENTS),
        ColumnMap::named(TRIGGER_TIMING, "ACTION_TIMING").decoded(TRIGGER_TIMINGS),
        ColumnMap::named(TRIGGER_BODY, "ACTION_STATEMENT"),
    ],
};

static TABLE_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::TableDescriptions,
    sql: "SELECT TABLE_SCHEMA AS SchemaOwner, TABLE_NAME AS TableName,
    COALESCE(LONG_COMMENT, TABLE_TEXT) AS TableDescription
FROM QSYS2.SYSTABLES
WHERE COALESCE(LONG_COMMENT, TABLE_TEXT) IS NOT NULL
    AND {scope}
ORDER BY TABLE_SCHEMA, TABLE_NAME",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::named(TABLE_SCHEMA, "SchemaOwner"),
        ColumnMap::named(TABLE_NAME, "TableName"),
        ColumnMap::named(DESCRIPTION, "TableDescription").trimmed(),
    ],
};

static COLUMN_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ColumnDescriptions,
    sql: "SELECT TABLE_SCHEMA AS SchemaOwner, TABLE_NAME AS TableName, COLUMN_NAME AS ColumnName,
    COALESCE(LONG_COMMENT, COLUMN_TEXT) AS ColumnDescription
FROM QSYS2.SYSCOLUMNS
WHERE COALESCE(LONG_COMMENT, COLUMN_TEXT) IS NOT NULL
    AND {scope}
ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION",
    table_column: Some("TABLE_NAME"),
    schema_column: Some("TABLE_SCHEMA"),
    columns: &[
        ColumnMap::named(TABLE_SCHEMA, "SchemaOwner"),
        ColumnMap::named(TABLE_NAME, "TableName"),
        ColumnMap::named(COLUMN_NAME, "ColumnName"),
        ColumnMap::named(DESCRIPTION, "ColumnDescription").trimmed(),
    ],
};

/// Db2 for i backend.
#[derive(Debug, Clone, Default)]
pub struct Db2ISeriesBackend {
    dialect: Db2ISeriesDialect,
    scope_policy: ScopePolicy,
}

impl Db2ISeriesBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a schema whenever a table is named. Db2 for i table names
    /// are only unique within a library.
    pub fn with_scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.scope_policy = policy;
        self
    }
}

impl BackendReader for Db2ISeriesBackend {
    fn engine(&self) -> &str {
        "db2-iseries"
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn support(&self, category: MetadataCategory) -> CategorySupport {
        let template = match category {
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
        };
        CategorySupport::Native(template)
    }

    fn scope_policy(&self) -> ScopePolicy {
        self.scope_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RawRowSet, ScopeFilter, Value};
    use crate::normalize::normalize;
    use crate::query::ParameterBinder;

    fn bind(template: &QueryTemplate, scope: &ScopeFilter) -> String {
        ParameterBinder::new(&Db2ISeriesDialect::new())
            .bind(template, scope)
            .sql
    }

    #[test]
    fn test_identity_condition_is_grouped() {
        let sql = bind(&IDENTITY_COLUMNS, &ScopeFilter::all());
        assert!(sql.contains("WHERE HAS_DEFAULT IN ('I', 'J')\n    AND (TABLE_NAME = "));
        assert!(!sql.contains("OR HAS_DEFAULT"));
    }

    #[test]
    fn test_sequences_exclude_system_schemas() {
        let sql = bind(&SEQUENCES, &ScopeFilter::all());
        assert!(sql.contains("NOT IN ('SYSIBM', 'QSYS2', 'QSYS', 'SYSTOOLS')"));
        assert!(sql.contains("(SEQUENCE_SCHEMA = CAST(? AS VARCHAR(128))"));
    }

    #[test]
    fn test_decimal_31_sequence_bounds_normalize() {
        let max = "9".repeat(31);
        let raw = RawRowSet::with_rows(
            &["SCHEMA", "SEQUENCE_NAME", "INCREMENTBY", "MINVALUE", "MAXVALUE"],
            vec![vec![
                "SALES".into(),
                "ORDER_SEQ".into(),
                "1".into(),
                "1".into(),
                max.clone().into(),
            ]],
        );
        let rows = normalize(MetadataCategory::Sequences, SEQUENCES.columns, raw).unwrap();
        assert_eq!(rows.rows[0].get(MAX_VALUE), Some(&Value::Wide(max)));
    }

    #[test]
    fn test_foreign_keys_join_parent_by_ordinal() {
        assert!(FOREIGN_KEYS
            .sql
            .contains("parent.ORDINAL_POSITION = child.ORDINAL_POSITION"));
        assert!(FOREIGN_KEYS.sql.contains("LEFT JOIN QSYS2.SYSREFCST refs"));
        assert!(FOREIGN_KEYS.sql.contains("LEFT JOIN QSYS2.SYSKEYCST parent"));
    }

    #[test]
    fn test_overrides_every_category() {
        let backend = Db2ISeriesBackend::new();
        for category in MetadataCategory::ALL {
            assert!(matches!(
                backend.support(category),
                CategorySupport::Native(_)
            ));
        }
    }

    #[test]
    fn test_scope_policy_is_configurable() {
        let backend =
            Db2ISeriesBackend::new().with_scope_policy(ScopePolicy::TableRequiresSchema);
        assert_eq!(backend.scope_policy(), ScopePolicy::TableRequiresSchema);
        assert_eq!(Db2ISeriesBackend::new().scope_policy(), ScopePolicy::Independent);
    }
}
