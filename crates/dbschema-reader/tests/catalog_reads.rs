//! End-to-end catalog reads against an in-memory connection.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dbschema_reader::query::BoundQuery;
use dbschema_reader::{
    BackendCatalog, CatalogConnection, DriverError, MetadataCategory, RawRowSet, ReaderError,
    ScopeFilter, SchemaReader, Value,
};

/// Catalog rows tagged with the table and schema they belong to.
///
/// Applies the `(col = p OR p IS NULL)` predicate the binder renders, with
/// the table pair of parameters first and the schema pair second.
struct InMemoryCatalog {
    columns: Vec<&'static str>,
    rows: Vec<TaggedRow>,
    calls: AtomicUsize,
}

impl InMemoryCatalog {
    fn new(columns: Vec<&'static str>, rows: Vec<TaggedRow>) -> Self {
        Self {
            columns,
            rows,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn matches(param: Option<&Option<String>>, value: &str) -> bool {
    match param {
        Some(Some(wanted)) => wanted == value,
        _ => true,
    }
}

#[async_trait]
impl CatalogConnection for InMemoryCatalog {
    async fn fetch(&self, query: &BoundQuery) -> Result<RawRowSet, DriverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(query.params.len(), 4, "expected table and schema clauses");
        let rows = self
            .rows
            .iter()
            .filter(|(table, schema, _)| {
                matches(query.params.first(), table) && matches(query.params.get(2), schema)
            })
            .map(|(_, _, values)| values.clone())
            .collect();
        Ok(RawRowSet::with_rows(&self.columns, rows))
    }
}

fn reader(engine: &str) -> SchemaReader {
    SchemaReader::for_engine(&BackendCatalog::with_builtins(), engine).unwrap()
}

type TaggedRow = (&'static str, &'static str, Vec<Value>);

fn pk(schema: &'static str, table: &'static str, name: &str, column: &str, ordinal: i64) -> TaggedRow {
    (
        table,
        schema,
        vec![
            schema.into(),
            name.into(),
            schema.into(),
            table.into(),
            column.into(),
            Value::Int(ordinal),
        ],
    )
}

fn postgres_primary_keys() -> InMemoryCatalog {
    InMemoryCatalog::new(
        vec![
            "constraint_schema",
            "constraint_name",
            "table_schema",
            "table_name",
            "column_name",
            "ordinal_position",
        ],
        vec![
            pk("sales", "orders", "pk_orders", "order_id", 1),
            pk("sales", "orders", "pk_orders", "order_date", 2),
            pk("sales", "customers", "pk_customers", "customer_id", 1),
            pk("archive", "orders", "pk_orders", "order_id", 1),
        ],
    )
}

#[tokio::test]
async fn unset_scope_returns_every_row() {
    let conn = postgres_primary_keys();
    let rows = reader("postgres")
        .read(&conn, MetadataCategory::PrimaryKeys, &ScopeFilter::all())
        .await
        .unwrap();
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn each_dimension_filters_independently() {
    let conn = postgres_primary_keys();
    let reader = reader("postgres");

    let by_table = reader
        .primary_keys(&conn, &ScopeFilter::table("orders"))
        .await
        .unwrap();
    assert_eq!(by_table.len(), 2);

    let by_schema = reader
        .primary_keys(&conn, &ScopeFilter::schema("sales"))
        .await
        .unwrap();
    assert_eq!(by_schema.len(), 2);

    let both = reader
        .primary_keys(&conn, &ScopeFilter::table("orders").in_schema("sales"))
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].column_names(), vec!["order_id", "order_date"]);
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let conn = postgres_primary_keys();
    let reader = reader("postgres");
    let scope = ScopeFilter::schema("sales");

    let first = reader
        .read(&conn, MetadataCategory::PrimaryKeys, &scope)
        .await
        .unwrap();
    let second = reader
        .read(&conn, MetadataCategory::PrimaryKeys, &scope)
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(conn.calls(), 2);
}

#[tokio::test]
async fn backends_normalize_to_the_same_rows() {
    // ODBC hands every Db2 value back as text.
    let db2 = InMemoryCatalog::new(
        vec![
            "CONSTRAINT_SCHEMA",
            "CONSTRAINT_NAME",
            "SCHEMA_NAME",
            "TABLE_NAME",
            "COLUMN_NAME",
            "ORDINAL_POSITION",
        ],
        vec![
            (
                "orders",
                "sales",
                vec![
                    "sales".into(),
                    "pk_orders".into(),
                    "sales".into(),
                    "orders".into(),
                    "order_date".into(),
                    "2".into(),
                ],
            ),
            (
                "orders",
                "sales",
                vec![
                    "sales".into(),
                    "pk_orders".into(),
                    "sales".into(),
                    "orders".into(),
                    "order_id".into(),
                    "1".into(),
                ],
            ),
        ],
    );
    let pg = postgres_primary_keys();
    let scope = ScopeFilter::table("orders").in_schema("sales");

    let from_db2 = reader("db2-iseries")
        .read(&db2, MetadataCategory::PrimaryKeys, &scope)
        .await
        .unwrap();
    let from_pg = reader("postgres")
        .read(&pg, MetadataCategory::PrimaryKeys, &scope)
        .await
        .unwrap();

    assert_eq!(from_db2.schema().column_names(), from_pg.schema().column_names());
    assert_eq!(from_db2.sorted_rows(), from_pg.sorted_rows());
}

#[tokio::test]
async fn foreign_key_without_parent_is_reported() {
    let conn = InMemoryCatalog::new(
        vec![
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
        vec![(
            "order_lines",
            "sales",
            vec![
                "sales".into(),
                "fk_lines_orders".into(),
                "sales".into(),
                "order_lines".into(),
                "order_id".into(),
                Value::Int(1),
                Value::Null,
                Value::Null,
                "sales".into(),
                "orders".into(),
                "order_id".into(),
                "c".into(),
                "a".into(),
            ],
        )],
    );

    let err = reader("postgres")
        .foreign_keys(&conn, &ScopeFilter::all())
        .await
        .unwrap_err();
    match err {
        ReaderError::Integrity { constraint, .. } => {
            assert!(constraint.contains("fk_lines_orders"))
        }
        other => panic!("expected an integrity error, got {other}"),
    }
}

#[test]
fn system_sequences_are_excluded_without_a_filter() {
    let plan = reader("as400")
        .plan(MetadataCategory::Sequences, &ScopeFilter::all())
        .unwrap()
        .unwrap();
    assert!(plan
        .query
        .sql
        .contains("SEQUENCE_SCHEMA NOT IN ('SYSIBM', 'QSYS2', 'QSYS', 'SYSTOOLS')"));
    assert_eq!(plan.query.params, vec![None, None]);
}
