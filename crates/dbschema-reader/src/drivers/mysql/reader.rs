//! INFORMATION_SCHEMA overrides for MySQL and MariaDB.
//!
//! MySQL names every primary key `PRIMARY`, so the ANSI join from
//! REFERENTIAL_CONSTRAINTS to the parent key is ambiguous. Foreign keys
//! read the `REFERENCED_*` extension columns of KEY_COLUMN_USAGE instead.
//! Indexes and comments come from MySQL-only views.

use crate::core::col::*;
use crate::core::traits::{BackendReader, CategorySupport, Dialect};
use crate::core::{ConstraintNaming, MetadataCategory};
use crate::drivers::generic::FOREIGN_KEY_COLUMN_MAP;
use crate::query::{ColumnMap, QueryTemplate};

use super::dialect::MysqlDialect;

static FOREIGN_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ForeignKeys,
    sql: "SELECT kcu.CONSTRAINT_SCHEMA AS CONSTRAINT_SCHEMA, kcu.CONSTRAINT_NAME AS CONSTRAINT_NAME,
    kcu.TABLE_SCHEMA AS TABLE_SCHEMA, kcu.TABLE_NAME AS TABLE_NAME,
    kcu.COLUMN_NAME AS COLUMN_NAME, kcu.ORDINAL_POSITION AS ORDINAL_POSITION,
    rc.UNIQUE_CONSTRAINT_SCHEMA AS REFERENCED_CONSTRAINT_SCHEMA,
    rc.UNIQUE_CONSTRAINT_NAME AS REFERENCED_CONSTRAINT_NAME,
    kcu.REFERENCED_TABLE_SCHEMA AS REFERENCED_TABLE_SCHEMA,
    kcu.REFERENCED_TABLE_NAME AS REFERENCED_TABLE_NAME,
    kcu.REFERENCED_COLUMN_NAME AS REFERENCED_COLUMN_NAME,
    rc.DELETE_RULE AS DELETE_RULE, rc.UPDATE_RULE AS UPDATE_RULE
FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc
    ON rc.CONSTRAINT_SCHEMA = kcu.CONSTRAINT_SCHEMA
    AND rc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
    AND rc.TABLE_NAME = kcu.TABLE_NAME
WHERE kcu.REFERENCED_TABLE_NAME IS NOT NULL
    AND {scope}
ORDER BY kcu.TABLE_SCHEMA, kcu.TABLE_NAME, kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
    table_column: Some("kcu.TABLE_NAME"),
    schema_column: Some("kcu.TABLE_SCHEMA"),
    columns: FOREIGN_KEY_COLUMN_MAP,
};

static IDENTITY_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IdentityColumns,
    sql: "SELECT c.TABLE_SCHEMA, c.TABLE_NAME, c.COLUMN_NAME
FROM INFORMATION_SCHEMA.COLUMNS c
WHERE c.EXTRA LIKE '%auto_increment%'
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

// STATISTICS has one row per index column; DISTINCT folds them.
static INDEXES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Indexes,
    sql: "SELECT DISTINCT s.INDEX_SCHEMA, s.INDEX_NAME, s.TABLE_SCHEMA, s.TABLE_NAME,
    s.NON_UNIQUE, s.INDEX_TYPE
FROM INFORMATION_SCHEMA.STATISTICS s
WHERE {scope}
ORDER BY s.INDEX_SCHEMA, s.TABLE_NAME, s.INDEX_NAME",
    table_column: Some("s.TABLE_NAME"),
    schema_column: Some("s.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::named(IS_UNIQUE, "NON_UNIQUE").flag(&["0"]),
        ColumnMap::same(INDEX_TYPE),
    ],
};

// Functional key parts have no column name.
static INDEX_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IndexColumns,
    sql: "SELECT s.INDEX_SCHEMA, s.INDEX_NAME, s.TABLE_SCHEMA, s.TABLE_NAME,
    s.COLUMN_NAME, s.SEQ_IN_INDEX, s.COLLATION
FROM INFORMATION_SCHEMA.STATISTICS s
WHERE s.COLUMN_NAME IS NOT NULL
    AND {scope}
ORDER BY s.INDEX_SCHEMA, s.TABLE_NAME, s.INDEX_NAME, s.SEQ_IN_INDEX",
    table_column: Some("s.TABLE_NAME"),
    schema_column: Some("s.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::named(ORDINAL_POSITION, "SEQ_IN_INDEX"),
        ColumnMap::named(IS_DESCENDING, "COLLATION").flag(&["D"]),
    ],
};

static TABLE_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::TableDescriptions,
    sql: "SELECT t.TABLE_SCHEMA, t.TABLE_NAME, t.TABLE_COMMENT
FROM INFORMATION_SCHEMA.TABLES t
WHERE t.TABLE_TYPE = 'BASE TABLE'
    AND t.TABLE_COMMENT <> ''
    AND {scope}
ORDER BY t.TABLE_SCHEMA, t.TABLE_NAME",
    table_column: Some("t.TABLE_NAME"),
    schema_column: Some("t.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::named(DESCRIPTION, "TABLE_COMMENT"),
    ],
};

static COLUMN_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ColumnDescriptions,
    sql: "SELECT c.TABLE_SCHEMA, c.TABLE_NAME, c.COLUMN_NAME, c.COLUMN_COMMENT
FROM INFORMATION_SCHEMA.COLUMNS c
WHERE c.COLUMN_COMMENT <> ''
    AND {scope}
ORDER BY c.TABLE_SCHEMA, c.TABLE_NAME, c.ORDINAL_POSITION",
    table_column: Some("c.TABLE_NAME"),
    schema_column: Some("c.TABLE_SCHEMA"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::named(DESCRIPTION, "COLUMN_COMMENT"),
    ],
};

/// MySQL and MariaDB backend.
///
/// Constraint names are unique per table (every primary key is
/// `PRIMARY`). MySQL has no sequences.
#[derive(Debug, Clone, Default)]
pub struct MysqlBackend {
    dialect: MysqlDialect,
}

impl MysqlBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackendReader for MysqlBackend {
    fn engine(&self) -> &str {
        "mysql"
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn support(&self, category: MetadataCategory) -> CategorySupport {
        match category {
            MetadataCategory::ForeignKeys => CategorySupport::Native(&FOREIGN_KEYS),
            MetadataCategory::IdentityColumns => CategorySupport::Native(&IDENTITY_COLUMNS),
            MetadataCategory::Indexes => CategorySupport::Native(&INDEXES),
            MetadataCategory::IndexColumns => CategorySupport::Native(&INDEX_COLUMNS),
            MetadataCategory::TableDescriptions => CategorySupport::Native(&TABLE_DESCRIPTIONS),
            MetadataCategory::ColumnDescriptions => {
                CategorySupport::Native(&COLUMN_DESCRIPTIONS)
            }
            MetadataCategory::Sequences => CategorySupport::Unsupported,
            _ => CategorySupport::Generic,
        }
    }

    fn constraint_naming(&self) -> ConstraintNaming {
        ConstraintNaming::Table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RawRowSet, ScopeFilter, Value};
    use crate::normalize::normalize;
    use crate::query::ParameterBinder;

    #[test]
    fn test_sequences_unsupported() {
        assert!(matches!(
            MysqlBackend::new().support(MetadataCategory::Sequences),
            CategorySupport::Unsupported
        ));
    }

    #[test]
    fn test_foreign_keys_use_referenced_columns() {
        let bound = ParameterBinder::new(&MysqlDialect::new())
            .bind(&FOREIGN_KEYS, &ScopeFilter::schema("shop"));
        assert!(bound.sql.contains("kcu.REFERENCED_TABLE_NAME IS NOT NULL"));
        assert!(bound
            .sql
            .contains("(kcu.TABLE_NAME = ? OR ? IS NULL) AND (kcu.TABLE_SCHEMA = ? OR ? IS NULL)"));
        assert_eq!(
            bound.params,
            vec![None, None, Some("shop".into()), Some("shop".into())]
        );
    }

    #[test]
    fn test_index_flags() {
        let raw = RawRowSet::with_rows(
            &[
                "INDEX_SCHEMA",
                "INDEX_NAME",
                "TABLE_SCHEMA",
                "TABLE_NAME",
                "NON_UNIQUE",
                "INDEX_TYPE",
            ],
            vec![
                vec![
                    "shop".into(),
                    "PRIMARY".into(),
                    "shop".into(),
                    "orders".into(),
                    Value::Int(0),
                    "BTREE".into(),
                ],
                vec![
                    "shop".into(),
                    "ix_orders_placed".into(),
                    "shop".into(),
                    "orders".into(),
                    Value::Int(1),
                    "BTREE".into(),
                ],
            ],
        );
        let rows = normalize(MetadataCategory::Indexes, INDEXES.columns, raw).unwrap();
        assert_eq!(rows.rows[0].flag(IS_UNIQUE), Some(true));
        assert_eq!(rows.rows[1].flag(IS_UNIQUE), Some(false));
    }

    #[test]
    fn test_collation_marks_descending() {
        let raw = RawRowSet::with_rows(
            &[
                "INDEX_SCHEMA",
                "INDEX_NAME",
                "TABLE_SCHEMA",
                "TABLE_NAME",
                "COLUMN_NAME",
                "SEQ_IN_INDEX",
                "COLLATION",
            ],
            vec![vec![
                "shop".into(),
                "ix_orders_placed".into(),
                "shop".into(),
                "orders".into(),
                "placed_at".into(),
                Value::Int(1),
                "D".into(),
            ]],
        );
        let rows = normalize(MetadataCategory::IndexColumns, INDEX_COLUMNS.columns, raw).unwrap();
        assert_eq!(rows.rows[0].flag(IS_DESCENDING), Some(true));
        assert_eq!(rows.rows[0].int(ORDINAL_POSITION), Some(1));
    }
}
