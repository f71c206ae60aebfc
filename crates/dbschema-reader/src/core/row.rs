//! Raw driver result sets and canonical row sets.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::category::{CanonicalSchema, MetadataCategory};
use super::value::Value;

/// Tabular result exactly as a driver returned it.
///
/// Column names keep the backend's own aliases and casing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawRowSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build from string slices; used by drivers and tests alike.
    pub fn with_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    /// Case-insensitive column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row in canonical layout.
///
/// Values are stored in the category's canonical column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRow {
    schema: &'static CanonicalSchema,
    values: Vec<Value>,
}

impl CanonicalRow {
    /// Caller guarantees `values` follows `schema` order.
    pub(crate) fn new(schema: &'static CanonicalSchema, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// Value of a canonical column, `None` if the category has no such column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.schema.position(column).map(|i| &self.values[i])
    }

    /// Text value of a column; NULL and missing columns yield `None`.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    pub fn flag(&self, column: &str) -> Option<bool> {
        self.get(column).and_then(Value::as_bool)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Pairs of (canonical column name, value) in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.schema
            .columns
            .iter()
            .map(|c| c.name)
            .zip(self.values.iter())
    }
}

impl Serialize for CanonicalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Complete canonical result of one category read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalRowSet {
    pub category: MetadataCategory,
    pub rows: Vec<CanonicalRow>,
}

impl CanonicalRowSet {
    /// An empty result for a category.
    pub fn empty(category: MetadataCategory) -> Self {
        Self {
            category,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &'static CanonicalSchema {
        self.category.canonical_schema()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in a stable order, for order-insensitive comparison.
    pub fn sorted_rows(&self) -> Vec<&CanonicalRow> {
        let mut rows: Vec<&CanonicalRow> = self.rows.iter().collect();
        rows.sort_by_key(|r| r.values().iter().map(|v| v.to_string()).collect::<Vec<_>>());
        rows
    }
}
