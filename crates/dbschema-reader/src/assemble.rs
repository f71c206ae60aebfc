//! Folding canonical rows into descriptors.
//!
//! Key catalogs return one row per (constraint, column) pair. The
//! functions here group those rows by constraint identity, order each
//! group by ordinal position, and check the group is internally
//! consistent. Inconsistent catalog state is reported as
//! [`ReaderError::Integrity`]; nothing is merged or guessed.

use std::collections::BTreeMap;

use tracing::debug;

use crate::core::col::*;
use crate::core::{
    CanonicalRow, CanonicalRowSet, ConstraintDescriptor, ConstraintNaming, ForeignKeyDescriptor,
    IdentityColumnDescriptor, IndexColumn, IndexDescriptor, KeyColumn, MetadataCategory,
    ReferentialAction, SequenceDescriptor, Value,
};
use crate::error::{ReaderError, Result};

/// Identity of a constraint group. The owning table is part of the key
/// only when the engine scopes constraint names per table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    schema: String,
    name: String,
    table: Option<(String, String)>,
}

impl GroupKey {
    fn label(&self) -> String {
        match &self.table {
            Some((schema, table)) => format!("{}.{} on {}.{}", self.schema, self.name, schema, table),
            None => format!("{}.{}", self.schema, self.name),
        }
    }
}

fn expect_category(rows: &CanonicalRowSet, expected: MetadataCategory) -> Result<()> {
    if rows.category == expected {
        Ok(())
    } else {
        Err(ReaderError::normalization(
            expected,
            format!("expected {} rows, got {}", expected, rows.category),
        ))
    }
}

/// Text value that must be present.
fn required(
    row: &CanonicalRow,
    column: &str,
    category: MetadataCategory,
    constraint: &str,
) -> Result<String> {
    row.text(column).map(str::to_string).ok_or_else(|| {
        ReaderError::integrity(category, constraint, format!("'{}' is NULL", column))
    })
}

/// Group rows by constraint identity, preserving catalog order within a group.
fn group_rows(
    rows: Vec<CanonicalRow>,
    category: MetadataCategory,
    naming: ConstraintNaming,
) -> Result<BTreeMap<GroupKey, Vec<CanonicalRow>>> {
    let mut groups: BTreeMap<GroupKey, Vec<CanonicalRow>> = BTreeMap::new();
    for row in rows {
        let name = required(&row, CONSTRAINT_NAME, category, "<unnamed>")?;
        let schema = required(&row, CONSTRAINT_SCHEMA, category, &name)?;
        let table = match naming {
            ConstraintNaming::Schema => None,
            ConstraintNaming::Table => Some((
                required(&row, TABLE_SCHEMA, category, &name)?,
                required(&row, TABLE_NAME, category, &name)?,
            )),
        };
        groups
            .entry(GroupKey {
                schema,
                name,
                table,
            })
            .or_default()
            .push(row);
    }
    Ok(groups)
}

/// Sort a group by ordinal and build its descriptor.
///
/// Ordinals must be unique and contiguous from the smallest one, and every
/// row must name the same owning table.
fn build_constraint(
    key: &GroupKey,
    rows: &mut [CanonicalRow],
    category: MetadataCategory,
) -> Result<ConstraintDescriptor> {
    let label = key.label();
    if rows.iter().any(|row| row.int(ORDINAL_POSITION).is_none()) {
        return Err(ReaderError::integrity(
            category,
            &label,
            "column without an ordinal position",
        ));
    }
    rows.sort_by_key(|row| row.int(ORDINAL_POSITION));

    let table_schema = required(&rows[0], TABLE_SCHEMA, category, &label)?;
    let table = required(&rows[0], TABLE_NAME, category, &label)?;
    let start = rows[0].int(ORDINAL_POSITION).unwrap_or_default();

    let mut columns = Vec::with_capacity(rows.len());
    for (expected, row) in (start..).zip(rows.iter()) {
        let ordinal = row.int(ORDINAL_POSITION).unwrap_or_default();
        if ordinal != expected {
            return Err(ReaderError::integrity(
                category,
                &label,
                format!(
                    "column ordinals are not contiguous: expected {}, found {}",
                    expected, ordinal
                ),
            ));
        }
        let row_table = (row.text(TABLE_SCHEMA), row.text(TABLE_NAME));
        if row_table != (Some(table_schema.as_str()), Some(table.as_str())) {
            return Err(ReaderError::integrity(
                category,
                &label,
                format!(
                    "rows disagree on owning table: {}.{} vs {}.{}",
                    table_schema,
                    table,
                    row_table.0.unwrap_or("NULL"),
                    row_table.1.unwrap_or("NULL")
                ),
            ));
        }
        columns.push(KeyColumn {
            name: required(row, COLUMN_NAME, category, &label)?,
            ordinal,
        });
    }

    Ok(ConstraintDescriptor {
        schema: key.schema.clone(),
        name: key.name.clone(),
        table_schema,
        table,
        columns,
    })
}

fn assemble_keys(
    rows: CanonicalRowSet,
    category: MetadataCategory,
    naming: ConstraintNaming,
) -> Result<Vec<ConstraintDescriptor>> {
    expect_category(&rows, category)?;
    let groups = group_rows(rows.rows, category, naming)?;
    let mut descriptors = Vec::with_capacity(groups.len());
    for (key, mut group) in groups {
        descriptors.push(build_constraint(&key, &mut group, category)?);
    }
    debug!("Assembled {} {} constraints", descriptors.len(), category);
    Ok(descriptors)
}

/// Fold primary-key rows into one descriptor per constraint.
pub fn assemble_primary_keys(
    rows: CanonicalRowSet,
    naming: ConstraintNaming,
) -> Result<Vec<ConstraintDescriptor>> {
    assemble_keys(rows, MetadataCategory::PrimaryKeys, naming)
}

/// Fold unique-key rows into one descriptor per constraint.
pub fn assemble_unique_keys(
    rows: CanonicalRowSet,
    naming: ConstraintNaming,
) -> Result<Vec<ConstraintDescriptor>> {
    assemble_keys(rows, MetadataCategory::UniqueKeys, naming)
}

/// Columns naming the parent key; every row of a foreign key must agree on them.
const TARGET_COLUMNS: [&str; 4] = [
    REFERENCED_CONSTRAINT_SCHEMA,
    REFERENCED_CONSTRAINT_NAME,
    REFERENCED_TABLE_SCHEMA,
    REFERENCED_TABLE_NAME,
];

fn parse_rule(row: &CanonicalRow, column: &str, label: &str) -> Result<ReferentialAction> {
    let category = MetadataCategory::ForeignKeys;
    let text = required(row, column, category, label)?;
    text.parse()
        .map_err(|e: String| ReaderError::normalization(category, format!("{}: {}", label, e)))
}

/// Fold foreign-key rows into descriptors with resolved targets.
///
/// Every row must resolve its referenced constraint, table and column; a
/// row where the catalog join found no parent key is an integrity error
/// for the whole constraint.
pub fn assemble_foreign_keys(
    rows: CanonicalRowSet,
    naming: ConstraintNaming,
) -> Result<Vec<ForeignKeyDescriptor>> {
    let category = MetadataCategory::ForeignKeys;
    expect_category(&rows, category)?;
    let groups = group_rows(rows.rows, category, naming)?;

    let mut descriptors = Vec::with_capacity(groups.len());
    for (key, mut group) in groups {
        let constraint = build_constraint(&key, &mut group, category)?;
        let label = key.label();

        let unresolved = |column: &str| {
            ReaderError::integrity(
                category,
                &label,
                format!(
                    "referenced key not found in the key-column catalog ({} is NULL)",
                    column
                ),
            )
        };

        let first = &group[0];
        let target = TARGET_COLUMNS.map(|column| first.text(column).map(str::to_string));
        let delete_rule = parse_rule(first, DELETE_RULE, &label)?;
        let update_rule = parse_rule(first, UPDATE_RULE, &label)?;

        let mut referenced_columns = Vec::with_capacity(group.len());
        for row in &group {
            for (column, value) in TARGET_COLUMNS.into_iter().zip(target.iter()) {
                match (row.text(column), value) {
                    (None, _) | (_, None) => return Err(unresolved(column)),
                    (Some(a), Some(b)) if a != b.as_str() => {
                        return Err(ReaderError::integrity(
                            category,
                            &label,
                            format!("rows disagree on {}: {} vs {}", column, b, a),
                        ))
                    }
                    _ => {}
                }
            }
            if parse_rule(row, DELETE_RULE, &label)? != delete_rule
                || parse_rule(row, UPDATE_RULE, &label)? != update_rule
            {
                return Err(ReaderError::integrity(
                    category,
                    &label,
                    "rows disagree on referential actions",
                ));
            }
            let column = row
                .text(REFERENCED_COLUMN_NAME)
                .ok_or_else(|| unresolved(REFERENCED_COLUMN_NAME))?;
            referenced_columns.push(column.to_string());
        }

        let [Some(referenced_constraint_schema), Some(referenced_constraint), Some(referenced_table_schema), Some(referenced_table)] = target
        else {
            return Err(unresolved(REFERENCED_CONSTRAINT_NAME));
        };

        descriptors.push(ForeignKeyDescriptor {
            constraint,
            referenced_constraint_schema,
            referenced_constraint,
            referenced_table_schema,
            referenced_table,
            referenced_columns,
            delete_rule,
            update_rule,
        });
    }
    debug!("Assembled {} foreign keys", descriptors.len());
    Ok(descriptors)
}

/// One descriptor per sequence row.
pub fn assemble_sequences(rows: CanonicalRowSet) -> Result<Vec<SequenceDescriptor>> {
    let category = MetadataCategory::Sequences;
    expect_category(&rows, category)?;
    rows.rows
        .iter()
        .map(|row| {
            let name = required(row, SEQUENCE_NAME, category, "<unnamed>")?;
            let schema = required(row, SEQUENCE_SCHEMA, category, &name)?;
            let increment = row
                .get(INCREMENT_BY)
                .and_then(Value::as_exact)
                .ok_or_else(|| {
                    ReaderError::integrity(category, &name, "sequence has no increment")
                })?;
            Ok(SequenceDescriptor {
                schema,
                name,
                increment,
                min_value: row.get(MIN_VALUE).and_then(Value::as_exact),
                max_value: row.get(MAX_VALUE).and_then(Value::as_exact),
            })
        })
        .collect()
}

/// One descriptor per identity column row.
pub fn assemble_identity_columns(rows: CanonicalRowSet) -> Result<Vec<IdentityColumnDescriptor>> {
    let category = MetadataCategory::IdentityColumns;
    expect_category(&rows, category)?;
    rows.rows
        .iter()
        .map(|row| {
            let table = required(row, TABLE_NAME, category, "<identity>")?;
            Ok(IdentityColumnDescriptor {
                schema: required(row, TABLE_SCHEMA, category, &table)?,
                column: required(row, COLUMN_NAME, category, &table)?,
                table,
            })
        })
        .collect()
}

type IndexKey = (String, String, String, String);

/// Join index rows with their column rows.
///
/// Indexes whose columns are all expressions come back with no columns.
/// A column row whose index is not in `indexes` is an integrity error.
pub fn assemble_indexes(
    indexes: CanonicalRowSet,
    index_columns: CanonicalRowSet,
) -> Result<Vec<IndexDescriptor>> {
    expect_category(&indexes, MetadataCategory::Indexes)?;
    expect_category(&index_columns, MetadataCategory::IndexColumns)?;

    let key_of = |row: &CanonicalRow, category: MetadataCategory| -> Result<IndexKey> {
        let name = required(row, INDEX_NAME, category, "<unnamed>")?;
        Ok((
            required(row, INDEX_SCHEMA, category, &name)?,
            name.clone(),
            required(row, TABLE_SCHEMA, category, &name)?,
            required(row, TABLE_NAME, category, &name)?,
        ))
    };

    let mut by_key: BTreeMap<IndexKey, IndexDescriptor> = BTreeMap::new();
    for row in &indexes.rows {
        let key = key_of(row, MetadataCategory::Indexes)?;
        let descriptor = IndexDescriptor {
            schema: key.0.clone(),
            name: key.1.clone(),
            table_schema: key.2.clone(),
            table: key.3.clone(),
            is_unique: row.flag(IS_UNIQUE).unwrap_or(false),
            index_type: row.text(INDEX_TYPE).map(str::to_string),
            columns: Vec::new(),
        };
        if by_key.insert(key, descriptor).is_some() {
            return Err(ReaderError::integrity(
                MetadataCategory::Indexes,
                row.text(INDEX_NAME).unwrap_or_default(),
                "index listed twice",
            ));
        }
    }

    let category = MetadataCategory::IndexColumns;
    for row in &index_columns.rows {
        let key = key_of(row, category)?;
        let label = format!("{}.{}", key.0, key.1);
        let ordinal = row.int(ORDINAL_POSITION).ok_or_else(|| {
            ReaderError::integrity(category, &label, "column without an ordinal position")
        })?;
        let column = IndexColumn {
            name: required(row, COLUMN_NAME, category, &label)?,
            ordinal,
            descending: row.flag(IS_DESCENDING).unwrap_or(false),
        };
        by_key
            .get_mut(&key)
            .ok_or_else(|| {
                ReaderError::integrity(
                    category,
                    &label,
                    format!("index on {}.{} not found", key.2, key.3),
                )
            })?
            .columns
            .push(column);
    }

    let mut descriptors: Vec<IndexDescriptor> = by_key.into_values().collect();
    for index in &mut descriptors {
        index.columns.sort_by_key(|c| c.ordinal);
        if index.columns.windows(2).any(|w| w[0].ordinal == w[1].ordinal) {
            return Err(ReaderError::integrity(
                category,
                format!("{}.{}", index.schema, index.name),
                "duplicate column ordinal",
            ));
        }
    }
    debug!("Assembled {} indexes", descriptors.len());
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExactNumber;
    use rust_decimal::Decimal;

    fn row_set(category: MetadataCategory, rows: Vec<Vec<Value>>) -> CanonicalRowSet {
        let schema = category.canonical_schema();
        CanonicalRowSet {
            category,
            rows: rows
                .into_iter()
                .map(|values| CanonicalRow::new(schema, values))
                .collect(),
        }
    }

    fn key_row(constraint: &str, table: &str, column: &str, ordinal: i64) -> Vec<Value> {
        vec![
            "SALES".into(),
            constraint.into(),
            "SALES".into(),
            table.into(),
            column.into(),
            ordinal.into(),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    fn fk_row(
        constraint: &str,
        column: &str,
        ordinal: i64,
        parent_key: Option<&str>,
        parent_table: Option<&str>,
        parent_column: Option<&str>,
        delete_rule: &str,
    ) -> Vec<Value> {
        vec![
            "SALES".into(),
            constraint.into(),
            "SALES".into(),
            "ORDER_LINES".into(),
            column.into(),
            ordinal.into(),
            parent_key.map(|_| "SALES").into(),
            parent_key.into(),
            parent_table.map(|_| "SALES").into(),
            parent_table.into(),
            parent_column.into(),
            delete_rule.into(),
            "NO ACTION".into(),
        ]
    }

    #[test]
    fn test_orders_primary_key() {
        // Catalog order is not key order.
        let rows = row_set(
            MetadataCategory::PrimaryKeys,
            vec![
                key_row("PK_ORDERS", "ORDERS", "ORDER_DATE", 2),
                key_row("PK_ORDERS", "ORDERS", "ORDER_ID", 1),
            ],
        );
        let keys = assemble_primary_keys(rows, ConstraintNaming::Schema).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "PK_ORDERS");
        assert_eq!(keys[0].table, "ORDERS");
        assert_eq!(keys[0].column_names(), vec!["ORDER_ID", "ORDER_DATE"]);
    }

    #[test]
    fn test_ordinal_gap_is_an_integrity_error() {
        let rows = row_set(
            MetadataCategory::PrimaryKeys,
            vec![
                key_row("PK_ORDERS", "ORDERS", "ORDER_ID", 1),
                key_row("PK_ORDERS", "ORDERS", "ORDER_DATE", 3),
            ],
        );
        let err = assemble_primary_keys(rows, ConstraintNaming::Schema).unwrap_err();
        assert!(matches!(err, ReaderError::Integrity { .. }));
    }

    #[test]
    fn test_duplicate_ordinal_is_an_integrity_error() {
        let rows = row_set(
            MetadataCategory::UniqueKeys,
            vec![
                key_row("UQ_CODE", "ORDERS", "CODE", 1),
                key_row("UQ_CODE", "ORDERS", "REGION", 1),
            ],
        );
        assert!(matches!(
            assemble_unique_keys(rows, ConstraintNaming::Schema),
            Err(ReaderError::Integrity { .. })
        ));
    }

    #[test]
    fn test_owning_table_mismatch_is_an_integrity_error() {
        let rows = row_set(
            MetadataCategory::PrimaryKeys,
            vec![
                key_row("PK_X", "ORDERS", "ID", 1),
                key_row("PK_X", "INVOICES", "ID", 2),
            ],
        );
        let err = assemble_primary_keys(rows, ConstraintNaming::Schema).unwrap_err();
        assert!(err.to_string().contains("PK_X"));
    }

    #[test]
    fn test_table_scoped_names_split_groups() {
        // MySQL names every primary key PRIMARY.
        let rows = row_set(
            MetadataCategory::PrimaryKeys,
            vec![
                key_row("PRIMARY", "ORDERS", "ID", 1),
                key_row("PRIMARY", "INVOICES", "ID", 1),
            ],
        );
        let keys = assemble_primary_keys(rows, ConstraintNaming::Table).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].table, "INVOICES");
        assert_eq!(keys[1].table, "ORDERS");
    }

    #[test]
    fn test_foreign_key_resolves_parent() {
        let rows = row_set(
            MetadataCategory::ForeignKeys,
            vec![
                fk_row("FK_LINES_ORDERS", "ORDER_DATE", 2, Some("PK_ORDERS"), Some("ORDERS"), Some("ORDER_DATE"), "CASCADE"),
                fk_row("FK_LINES_ORDERS", "ORDER_ID", 1, Some("PK_ORDERS"), Some("ORDERS"), Some("ORDER_ID"), "CASCADE"),
            ],
        );
        let fks = assemble_foreign_keys(rows, ConstraintNaming::Schema).unwrap();
        assert_eq!(fks.len(), 1);
        let fk = &fks[0];
        assert_eq!(fk.constraint.column_names(), vec!["ORDER_ID", "ORDER_DATE"]);
        assert_eq!(fk.referenced_columns, vec!["ORDER_ID", "ORDER_DATE"]);
        assert_eq!(fk.referenced_constraint, "PK_ORDERS");
        assert_eq!(fk.referenced_table, "ORDERS");
        assert_eq!(fk.delete_rule, ReferentialAction::Cascade);
        assert_eq!(fk.update_rule, ReferentialAction::NoAction);
    }

    #[test]
    fn test_missing_parent_constraint_is_an_integrity_error() {
        let rows = row_set(
            MetadataCategory::ForeignKeys,
            vec![fk_row("FK_DANGLING", "ORDER_ID", 1, None, None, None, "RESTRICT")],
        );
        let err = assemble_foreign_keys(rows, ConstraintNaming::Schema).unwrap_err();
        assert!(matches!(err, ReaderError::Integrity { .. }));
        assert!(err.to_string().contains("FK_DANGLING"));
    }

    #[test]
    fn test_partially_resolved_foreign_key_is_rejected() {
        let rows = row_set(
            MetadataCategory::ForeignKeys,
            vec![
                fk_row("FK_LINES_ORDERS", "ORDER_ID", 1, Some("PK_ORDERS"), Some("ORDERS"), Some("ORDER_ID"), "CASCADE"),
                fk_row("FK_LINES_ORDERS", "ORDER_DATE", 2, Some("PK_ORDERS"), Some("ORDERS"), None, "CASCADE"),
            ],
        );
        assert!(matches!(
            assemble_foreign_keys(rows, ConstraintNaming::Schema),
            Err(ReaderError::Integrity { .. })
        ));
    }

    #[test]
    fn test_unknown_rule_is_a_normalization_error() {
        let rows = row_set(
            MetadataCategory::ForeignKeys,
            vec![fk_row("FK_X", "ORDER_ID", 1, Some("PK_ORDERS"), Some("ORDERS"), Some("ORDER_ID"), "EXPLODE")],
        );
        assert!(matches!(
            assemble_foreign_keys(rows, ConstraintNaming::Schema),
            Err(ReaderError::Normalization { .. })
        ));
    }

    #[test]
    fn test_wrong_category_is_rejected() {
        let rows = row_set(MetadataCategory::UniqueKeys, vec![]);
        assert!(assemble_primary_keys(rows, ConstraintNaming::Schema).is_err());
    }

    #[test]
    fn test_sequences_keep_missing_bounds_as_none() {
        let rows = row_set(
            MetadataCategory::Sequences,
            vec![vec![
                "SALES".into(),
                "ORDER_SEQ".into(),
                Value::Decimal(Decimal::from(5)),
                Value::Decimal(Decimal::from(1)),
                Value::Null,
            ]],
        );
        let seqs = assemble_sequences(rows).unwrap();
        assert_eq!(seqs[0].increment, ExactNumber::from(Decimal::from(5)));
        assert_eq!(seqs[0].min_value, Some(ExactNumber::from(1)));
        assert_eq!(seqs[0].max_value, None);
    }

    #[test]
    fn test_sequences_keep_wide_bounds() {
        let max = "9".repeat(38);
        let rows = row_set(
            MetadataCategory::Sequences,
            vec![vec![
                "dbo".into(),
                "ticket_seq".into(),
                Value::Decimal(Decimal::ONE),
                Value::Wide(format!("-{}", max)),
                Value::Wide(max.clone()),
            ]],
        );
        let seqs = assemble_sequences(rows).unwrap();
        assert_eq!(seqs[0].min_value, Some(ExactNumber::Digits(format!("-{}", max))));
        assert_eq!(seqs[0].max_value.as_ref().map(ToString::to_string), Some(max));
    }

    #[test]
    fn test_identity_columns() {
        let rows = row_set(
            MetadataCategory::IdentityColumns,
            vec![vec!["SALES".into(), "ORDERS".into(), "ORDER_ID".into()]],
        );
        let ids = assemble_identity_columns(rows).unwrap();
        assert_eq!(
            ids,
            vec![IdentityColumnDescriptor {
                schema: "SALES".into(),
                table: "ORDERS".into(),
                column: "ORDER_ID".into(),
            }]
        );
    }

    fn index_row(name: &str, unique: bool) -> Vec<Value> {
        vec![
            "SALES".into(),
            name.into(),
            "SALES".into(),
            "ORDERS".into(),
            unique.into(),
            Value::Null,
        ]
    }

    fn index_column_row(index: &str, column: &str, ordinal: i64, desc: bool) -> Vec<Value> {
        vec![
            "SALES".into(),
            index.into(),
            "SALES".into(),
            "ORDERS".into(),
            column.into(),
            ordinal.into(),
            desc.into(),
        ]
    }

    #[test]
    fn test_indexes_join_columns() {
        let indexes = row_set(
            MetadataCategory::Indexes,
            vec![index_row("IX_PLACED", false), index_row("UX_CODE", true)],
        );
        let columns = row_set(
            MetadataCategory::IndexColumns,
            vec![
                index_column_row("IX_PLACED", "ORDER_ID", 2, false),
                index_column_row("IX_PLACED", "PLACED_AT", 1, true),
                index_column_row("UX_CODE", "CODE", 1, false),
            ],
        );
        let result = assemble_indexes(indexes, columns).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "IX_PLACED");
        assert!(!result[0].is_unique);
        assert_eq!(result[0].columns[0].name, "PLACED_AT");
        assert!(result[0].columns[0].descending);
        assert_eq!(result[0].columns[1].name, "ORDER_ID");
        assert!(result[1].is_unique);
        assert_eq!(result[1].index_type, None);
    }

    #[test]
    fn test_orphan_index_column_is_an_integrity_error() {
        let indexes = row_set(MetadataCategory::Indexes, vec![index_row("IX_PLACED", false)]);
        let columns = row_set(
            MetadataCategory::IndexColumns,
            vec![index_column_row("IX_GONE", "CODE", 1, false)],
        );
        assert!(matches!(
            assemble_indexes(indexes, columns),
            Err(ReaderError::Integrity { .. })
        ));
    }
}
