//! sys.* catalog query templates for SQL Server.
//!
//! INFORMATION_SCHEMA covers tables, columns, check constraints and view
//! columns well enough. Keys read sys.key_constraints so that a foreign key
//! pointing at a unique index (not a constraint) still names its target.

use crate::core::col::*;
use crate::core::traits::{BackendReader, CategorySupport, Dialect};
use crate::core::MetadataCategory;
use crate::drivers::generic::KEY_COLUMN_MAP;
use crate::query::{ColumnMap, QueryTemplate, RULE_WORDS};

use super::dialect::MssqlDialect;

static PRIMARY_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::PrimaryKeys,
    sql: "SELECT s.name AS constraint_schema, kc.name AS constraint_name,
    s.name AS table_schema, t.name AS table_name,
    c.name AS column_name, ic.key_ordinal AS ordinal_position
FROM sys.key_constraints kc
INNER JOIN sys.tables t ON t.object_id = kc.parent_object_id
INNER JOIN sys.schemas s ON s.schema_id = t.schema_id
INNER JOIN sys.index_columns ic
    ON ic.object_id = kc.parent_object_id
    AND ic.index_id = kc.unique_index_id
INNER JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id
WHERE kc.type = 'PK'
    AND ic.key_ordinal > 0
    AND {scope}
ORDER BY s.name, kc.name, ic.key_ordinal",
    table_column: Some("t.name"),
    schema_column: Some("s.name"),
    columns: KEY_COLUMN_MAP,
};

static UNIQUE_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::UniqueKeys,
    sql: "SELECT s.name AS constraint_schema, kc.name AS constraint_name,
    s.name AS table_schema, t.name AS table_name,
    c.name AS column_name, ic.key_ordinal AS ordinal_position
FROM sys.key_constraints kc
INNER JOIN sys.tables t ON t.object_id = kc.parent_object_id
INNER JOIN sys.schemas s ON s.schema_id = t.schema_id
INNER JOIN sys.index_columns ic
    ON ic.object_id = kc.parent_object_id
    AND ic.index_id = kc.unique_index_id
INNER JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id
WHERE kc.type = 'UQ'
    AND ic.key_ordinal > 0
    AND {scope}
ORDER BY s.name, kc.name, ic.key_ordinal",
    table_column: Some("t.name"),
    schema_column: Some("s.name"),
    columns: KEY_COLUMN_MAP,
};

// The referenced "constraint" is the key constraint owning key_index_id,
// or the unique index itself when no constraint owns it.
static FOREIGN_KEYS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ForeignKeys,
    sql: "SELECT s.name AS constraint_schema, fk.name AS constraint_name,
    s.name AS table_schema, t.name AS table_name,
    c.name AS column_name, fkc.constraint_column_id AS ordinal_position,
    rs.name AS referenced_constraint_schema,
    COALESCE(kc.name, ri.name) AS referenced_constraint_name,
    rs.name AS referenced_table_schema, rt.name AS referenced_table_name,
    rc.name AS referenced_column_name,
    fk.delete_referential_action_desc AS delete_rule,
    fk.update_referential_action_desc AS update_rule
FROM sys.foreign_keys fk
INNER JOIN sys.tables t ON t.object_id = fk.parent_object_id
INNER JOIN sys.schemas s ON s.schema_id = t.schema_id
INNER JOIN sys.foreign_key_columns fkc ON fkc.constraint_object_id = fk.object_id
INNER JOIN sys.columns c
    ON c.object_id = fkc.parent_object_id
    AND c.column_id = fkc.parent_column_id
LEFT JOIN sys.tables rt ON rt.object_id = fk.referenced_object_id
LEFT JOIN sys.schemas rs ON rs.schema_id = rt.schema_id
LEFT JOIN sys.columns rc
    ON rc.object_id = fkc.referenced_object_id
    AND rc.column_id = fkc.referenced_column_id
LEFT JOIN sys.key_constraints kc
    ON kc.parent_object_id = fk.referenced_object_id
    AND kc.unique_index_id = fk.key_index_id
LEFT JOIN sys.indexes ri
    ON ri.object_id = fk.referenced_object_id
    AND ri.index_id = fk.key_index_id
WHERE {scope}
ORDER BY s.name, fk.name, fkc.constraint_column_id",
    table_column: Some("t.name"),
    schema_column: Some("s.name"),
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
        ColumnMap::same(DELETE_RULE).decoded(RULE_WORDS),
        ColumnMap::same(UPDATE_RULE).decoded(RULE_WORDS),
    ],
};

// sys.sequences stores bounds as sql_variant; decimal(38, 0) bounds reach
// 10^38-1, so they are read as text.
static SEQUENCES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Sequences,
    sql: "SELECT s.name AS sequence_schema, sq.name AS sequence_name,
    CAST(sq.increment AS varchar(40)) AS increment_by,
    CAST(sq.minimum_value AS varchar(40)) AS min_value,
    CAST(sq.maximum_value AS varchar(40)) AS max_value
FROM sys.sequences sq
INNER JOIN sys.schemas s ON s.schema_id = sq.schema_id
WHERE {scope}
ORDER BY s.name, sq.name",
    table_column: None,
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(SEQUENCE_SCHEMA),
        ColumnMap::same(SEQUENCE_NAME),
        ColumnMap::same(INCREMENT_BY),
        ColumnMap::same(MIN_VALUE),
        ColumnMap::same(MAX_VALUE),
    ],
};

static IDENTITY_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IdentityColumns,
    sql: "SELECT s.name AS table_schema, t.name AS table_name, c.name AS column_name
FROM sys.identity_columns c
INNER JOIN sys.tables t ON t.object_id = c.object_id
INNER JOIN sys.schemas s ON s.schema_id = t.schema_id
WHERE {scope}
ORDER BY s.name, t.name, c.column_id",
    table_column: Some("t.name"),
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
    ],
};

// Heaps (type 0) have no name and no key columns.
static INDEXES: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Indexes,
    sql: "SELECT s.name AS index_schema, i.name AS index_name,
    s.name AS table_schema, t.name AS table_name,
    i.is_unique, i.type_desc AS index_type
FROM sys.indexes i
INNER JOIN sys.tables t ON t.object_id = i.object_id
INNER JOIN sys.schemas s ON s.schema_id = t.schema_id
WHERE i.type > 0
    AND i.is_hypothetical = 0
    AND {scope}
ORDER BY s.name, i.name",
    table_column: Some("t.name"),
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(INDEX_SCHEMA),
        ColumnMap::same(INDEX_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(IS_UNIQUE),
        ColumnMap::same(INDEX_TYPE),
    ],
};

// key_ordinal 0 marks INCLUDE columns.
static INDEX_COLUMNS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::IndexColumns,
    sql: "SELECT s.name AS index_schema, i.name AS index_name,
    s.name AS table_schema, t.name AS table_name,
    c.name AS column_name, ic.key_ordinal AS ordinal_position,
    ic.is_descending_key AS is_descending
FROM sys.index_columns ic
INNER JOIN sys.indexes i ON i.object_id = ic.object_id AND i.index_id = ic.index_id
INNER JOIN sys.tables t ON t.object_id = i.object_id
INNER JOIN sys.schemas s ON s.schema_id = t.schema_id
INNER JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id
WHERE i.type > 0
    AND i.is_hypothetical = 0
    AND ic.key_ordinal > 0
    AND {scope}
ORDER BY s.name, i.name, ic.key_ordinal",
    table_column: Some("t.name"),
    schema_column: Some("s.name"),
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
    sql: "SELECT s.name AS view_schema, v.name AS view_name, m.definition
FROM sys.views v
INNER JOIN sys.schemas s ON s.schema_id = v.schema_id
LEFT JOIN sys.sql_modules m ON m.object_id = v.object_id
WHERE {scope}
ORDER BY s.name, v.name",
    table_column: Some("v.name"),
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(VIEW_SCHEMA),
        ColumnMap::same(VIEW_NAME),
        ColumnMap::same(DEFINITION),
    ],
};

// One row per triggering event. DML triggers live in their parent's schema.
static TRIGGERS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::Triggers,
    sql: "SELECT s.name AS trigger_schema, tr.name AS trigger_name,
    s.name AS table_schema, o.name AS table_name,
    te.type_desc AS triggering_event,
    CASE WHEN tr.is_instead_of_trigger = 1 THEN 'INSTEAD OF' ELSE 'AFTER' END AS trigger_timing,
    m.definition AS trigger_body
FROM sys.triggers tr
INNER JOIN sys.objects o ON o.object_id = tr.parent_id
INNER JOIN sys.schemas s ON s.schema_id = o.schema_id
INNER JOIN sys.trigger_events te ON te.object_id = tr.object_id
LEFT JOIN sys.sql_modules m ON m.object_id = tr.object_id
WHERE tr.parent_class = 1
    AND {scope}
ORDER BY s.name, tr.name, te.type",
    table_column: Some("o.name"),
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(TRIGGER_SCHEMA),
        ColumnMap::same(TRIGGER_NAME),
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(TRIGGERING_EVENT),
        ColumnMap::same(TRIGGER_TIMING),
        ColumnMap::same(TRIGGER_BODY),
    ],
};

static TABLE_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::TableDescriptions,
    sql: "SELECT s.name AS table_schema, o.name AS table_name,
    CAST(ep.value AS nvarchar(4000)) AS description
FROM sys.extended_properties ep
INNER JOIN sys.objects o ON o.object_id = ep.major_id
INNER JOIN sys.schemas s ON s.schema_id = o.schema_id
WHERE ep.class = 1
    AND ep.minor_id = 0
    AND ep.name = 'MS_Description'
    AND o.type IN ('U', 'V')
    AND {scope}
ORDER BY s.name, o.name",
    table_column: Some("o.name"),
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(DESCRIPTION),
    ],
};

static COLUMN_DESCRIPTIONS: QueryTemplate = QueryTemplate {
    category: MetadataCategory::ColumnDescriptions,
    sql: "SELECT s.name AS table_schema, o.name AS table_name, c.name AS column_name,
    CAST(ep.value AS nvarchar(4000)) AS description
FROM sys.extended_properties ep
INNER JOIN sys.objects o ON o.object_id = ep.major_id
INNER JOIN sys.schemas s ON s.schema_id = o.schema_id
INNER JOIN sys.columns c ON c.object_id = ep.major_id AND c.column_id = ep.minor_id
WHERE ep.class = 1
    AND ep.minor_id > 0
    AND ep.name = 'MS_Description'
    AND o.type IN ('U', 'V')
    AND {scope}
ORDER BY s.name, o.name, c.column_id",
    table_column: Some("o.name"),
    schema_column: Some("s.name"),
    columns: &[
        ColumnMap::same(TABLE_SCHEMA),
        ColumnMap::same(TABLE_NAME),
        ColumnMap::same(COLUMN_NAME),
        ColumnMap::same(DESCRIPTION),
    ],
};

/// SQL Server backend.
#[derive(Debug, Clone, Default)]
pub struct MssqlBackend {
    dialect: MssqlDialect,
}

impl MssqlBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackendReader for MssqlBackend {
    fn engine(&self) -> &str {
        "mssql"
    }

    fn dialect(&self) -> &dyn Dialect {
        &self.dialect
    }

    fn support(&self, category: MetadataCategory) -> CategorySupport {
        match category {
            MetadataCategory::PrimaryKeys => CategorySupport::Native(&PRIMARY_KEYS),
            MetadataCategory::UniqueKeys => CategorySupport::Native(&UNIQUE_KEYS),
            MetadataCategory::ForeignKeys => CategorySupport::Native(&FOREIGN_KEYS),
            MetadataCategory::Sequences => CategorySupport::Native(&SEQUENCES),
            MetadataCategory::IdentityColumns => CategorySupport::Native(&IDENTITY_COLUMNS),
            MetadataCategory::Indexes => CategorySupport::Native(&INDEXES),
            MetadataCategory::IndexColumns => CategorySupport::Native(&INDEX_COLUMNS),
            MetadataCategory::Views => CategorySupport::Native(&VIEWS),
            MetadataCategory::Triggers => CategorySupport::Native(&TRIGGERS),
            MetadataCategory::TableDescriptions => CategorySupport::Native(&TABLE_DESCRIPTIONS),
            MetadataCategory::ColumnDescriptions => {
                CategorySupport::Native(&COLUMN_DESCRIPTIONS)
            }
            MetadataCategory::Tables
            | MetadataCategory::Columns
            | MetadataCategory::CheckConstraints
            | MetadataCategory::ViewColumns => CategorySupport::Generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RawRowSet, ScopeFilter, Value};
    use crate::normalize::normalize;
    use crate::query::ParameterBinder;

    #[test]
    fn test_foreign_key_scope_uses_named_markers() {
        let bound = ParameterBinder::new(&MssqlDialect::new())
            .bind(&FOREIGN_KEYS, &ScopeFilter::table("Orders").in_schema("dbo"));
        assert!(bound
            .sql
            .contains("WHERE (t.name = @P1 OR @P2 IS NULL) AND (s.name = @P3 OR @P4 IS NULL)"));
        assert_eq!(bound.params.len(), 4);
    }

    #[test]
    fn test_referential_action_desc_decodes() {
        let raw = RawRowSet::with_rows(
            &[
                "constraint_schema",
                "constraint_name",
                "table_schema",
                "table_name",
                "column_name",
                "ordinal_position",
                "referenced_constraint_schema",
                "referenced_constraint_name",
                "referenced_table_schema",
                "referenced_table_name",
                "referenced_column_name",
                "delete_rule",
                "update_rule",
            ],
            vec![vec![
                "dbo".into(),
                "FK_Orders_Customers".into(),
                "dbo".into(),
                "Orders".into(),
                "CustomerId".into(),
                Value::Int(1),
                "dbo".into(),
                "UX_Customers_Code".into(),
                "dbo".into(),
                "Customers".into(),
                "Code".into(),
                "SET_NULL".into(),
                "NO_ACTION".into(),
            ]],
        );
        let rows = normalize(MetadataCategory::ForeignKeys, FOREIGN_KEYS.columns, raw).unwrap();
        assert_eq!(rows.rows[0].text(DELETE_RULE), Some("SET NULL"));
        assert_eq!(rows.rows[0].text(UPDATE_RULE), Some("NO ACTION"));
    }

    #[test]
    fn test_sequence_bounds_are_cast() {
        assert_eq!(SEQUENCES.sql.matches("AS varchar(40))").count(), 3);
        assert!(SEQUENCES.table_column.is_none());
    }

    #[test]
    fn test_decimal_38_sequence_bounds_normalize() {
        let max = "9".repeat(38);
        let raw = RawRowSet::with_rows(
            &["sequence_schema", "sequence_name", "increment_by", "min_value", "max_value"],
            vec![vec![
                "dbo".into(),
                "ticket_seq".into(),
                "1".into(),
                format!("-{}", max).into(),
                max.clone().into(),
            ]],
        );
        let rows = normalize(MetadataCategory::Sequences, SEQUENCES.columns, raw).unwrap();
        assert_eq!(rows.rows[0].get(INCREMENT_BY), Some(&Value::Decimal(1.into())));
        assert_eq!(rows.rows[0].get(MIN_VALUE), Some(&Value::Wide(format!("-{}", max))));
        assert_eq!(rows.rows[0].get(MAX_VALUE), Some(&Value::Wide(max)));
    }

    #[test]
    fn test_support_routes() {
        let backend = MssqlBackend::new();
        assert!(matches!(
            backend.support(MetadataCategory::CheckConstraints),
            CategorySupport::Generic
        ));
        assert!(matches!(
            backend.support(MetadataCategory::Triggers),
            CategorySupport::Native(_)
        ));
    }
}
