//! Mapping native result sets onto canonical layouts.
//!
//! [`normalize`] is a pure function of the category, the template's column
//! map, and the raw rows. Output columns and their order come only from
//! the category's canonical schema, so two backends that read the same
//! logical structure produce identical layouts.

use tracing::{debug, warn};

use crate::core::{CanonicalRow, CanonicalRowSet, MetadataCategory, RawRowSet, Value};
use crate::error::{ReaderError, Result};
use crate::query::{ColumnMap, Transform};

/// Resolved source of one canonical column.
enum Slot {
    Native { index: usize, transform: Transform },
    Absent,
}

/// Reshape raw rows into the canonical layout of `category`.
///
/// Fails with [`ReaderError::Normalization`] when the column map does not
/// cover the canonical schema, names a native column the result lacks, or
/// a value cannot be coerced to its canonical kind. Native columns the map
/// does not mention are dropped.
pub fn normalize(
    category: MetadataCategory,
    columns: &[ColumnMap],
    raw: RawRowSet,
) -> Result<CanonicalRowSet> {
    let schema = category.canonical_schema();

    // Drivers that only learn column names from rows report none for an
    // empty result; there is nothing to map either way.
    if raw.rows.is_empty() && raw.columns.is_empty() {
        return Ok(CanonicalRowSet::empty(category));
    }

    for map in columns {
        if schema.position(map.canonical).is_none() {
            return Err(ReaderError::normalization(
                category,
                format!("column map names unknown canonical column '{}'", map.canonical),
            ));
        }
    }

    let mut slots = Vec::with_capacity(schema.len());
    for canonical in schema.columns {
        let mut maps = columns.iter().filter(|m| m.canonical == canonical.name);
        let map = maps.next().ok_or_else(|| {
            ReaderError::normalization(
                category,
                format!("no mapping for canonical column '{}'", canonical.name),
            )
        })?;
        if maps.next().is_some() {
            return Err(ReaderError::normalization(
                category,
                format!("canonical column '{}' is mapped twice", canonical.name),
            ));
        }
        let slot = match map.native {
            Some(native) => {
                let index = raw.column_index(native).ok_or_else(|| {
                    ReaderError::normalization(
                        category,
                        format!(
                            "result has no column '{}' for '{}' (got: {})",
                            native,
                            canonical.name,
                            raw.columns.join(", ")
                        ),
                    )
                })?;
                Slot::Native {
                    index,
                    transform: map.transform,
                }
            }
            None => Slot::Absent,
        };
        slots.push(slot);
    }

    let ignored: Vec<&str> = raw
        .columns
        .iter()
        .filter(|c| {
            !columns
                .iter()
                .any(|m| m.native.is_some_and(|n| n.eq_ignore_ascii_case(c)))
        })
        .map(String::as_str)
        .collect();
    if !ignored.is_empty() {
        warn!(
            "Dropping {} native columns outside the canonical layout: {}",
            category,
            ignored.join(", ")
        );
    }

    let width = raw.columns.len();
    let mut rows = Vec::with_capacity(raw.rows.len());
    for (row_no, mut native_row) in raw.rows.into_iter().enumerate() {
        if native_row.len() != width {
            return Err(ReaderError::normalization(
                category,
                format!(
                    "row {} has {} values but the result declares {} columns",
                    row_no,
                    native_row.len(),
                    width
                ),
            ));
        }
        let mut values = Vec::with_capacity(slots.len());
        for (slot, canonical) in slots.iter().zip(schema.columns) {
            let value = match slot {
                Slot::Absent => Value::Null,
                Slot::Native { index, transform } => {
                    let cell = std::mem::replace(&mut native_row[*index], Value::Null);
                    let cell = apply(*transform, cell).map_err(|e| {
                        ReaderError::normalization(
                            category,
                            format!("row {} column '{}': {}", row_no, canonical.name, e),
                        )
                    })?;
                    cell.coerce(canonical.kind).map_err(|e| {
                        ReaderError::normalization(
                            category,
                            format!("row {} column '{}': {}", row_no, canonical.name, e),
                        )
                    })?
                }
            };
            values.push(value);
        }
        rows.push(CanonicalRow::new(schema, values));
    }

    debug!("Normalized {} {} rows", rows.len(), category);
    Ok(CanonicalRowSet { category, rows })
}

/// Apply a column transform to one native cell.
fn apply(transform: Transform, cell: Value) -> std::result::Result<Value, String> {
    match transform {
        Transform::None => Ok(cell),
        Transform::TrimEnd => Ok(match cell {
            Value::Text(s) => Value::Text(s.trim_end().to_string()),
            other => other,
        }),
        Transform::Decode(codes) => match cell {
            Value::Null => Ok(Value::Null),
            Value::Text(s) => {
                let key = s.trim();
                codes
                    .iter()
                    .find(|(code, _)| code.eq_ignore_ascii_case(key))
                    .map(|(_, word)| Value::Text(word.to_string()))
                    .ok_or_else(|| format!("unknown code '{}'", key))
            }
            other => Err(format!("cannot decode {} value", other.type_name())),
        },
        Transform::Flag(codes) => Ok(Value::Bool(match cell {
            Value::Null => false,
            Value::Text(s) => codes.iter().any(|c| c.eq_ignore_ascii_case(s.trim())),
            other => codes.iter().any(|c| *c == other.to_string()),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::col;
    use rust_decimal::Decimal;

    const SEQ_MAP: &[ColumnMap] = &[
        ColumnMap::named(col::SEQUENCE_SCHEMA, "SCHEMA"),
        ColumnMap::same(col::SEQUENCE_NAME),
        ColumnMap::named(col::INCREMENT_BY, "INCREMENTBY"),
        ColumnMap::named(col::MIN_VALUE, "minvalue"),
        ColumnMap::absent(col::MAX_VALUE),
    ];

    #[test]
    fn test_aliases_are_resolved_and_extras_dropped() {
        let raw = RawRowSet::with_rows(
            &["SCHEMA", "SEQUENCE_NAME", "INCREMENTBY", "MINVALUE", "EXTRA"],
            vec![vec![
                "APP".into(),
                "ORDER_SEQ".into(),
                "1".into(),
                Value::Int(1),
                "ignored".into(),
            ]],
        );
        let set = normalize(MetadataCategory::Sequences, SEQ_MAP, raw).unwrap();
        let row = &set.rows[0];
        assert_eq!(row.text(col::SEQUENCE_SCHEMA), Some("APP"));
        assert_eq!(
            row.get(col::INCREMENT_BY),
            Some(&Value::Decimal(Decimal::ONE))
        );
        assert_eq!(row.get(col::MAX_VALUE), Some(&Value::Null));
        assert_eq!(row.values().len(), 5);
    }

    #[test]
    fn test_missing_native_column_is_an_error() {
        let raw = RawRowSet::with_rows(&["SCHEMA", "SEQUENCE_NAME"], vec![]);
        let err = normalize(MetadataCategory::Sequences, SEQ_MAP, raw).unwrap_err();
        assert!(matches!(err, ReaderError::Normalization { .. }));
        assert!(err.to_string().contains("INCREMENTBY"));
    }

    #[test]
    fn test_incomplete_column_map_is_an_error() {
        let raw = RawRowSet::with_rows(&["SCHEMA"], vec![]);
        let err = normalize(
            MetadataCategory::Sequences,
            &[ColumnMap::named(col::SEQUENCE_SCHEMA, "SCHEMA")],
            raw,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no mapping"));
    }

    #[test]
    fn test_uncoercible_value_is_an_error() {
        let raw = RawRowSet::with_rows(
            &["SCHEMA", "SEQUENCE_NAME", "INCREMENTBY", "MINVALUE"],
            vec![vec!["A".into(), "S".into(), "one".into(), Value::Null]],
        );
        let err = normalize(MetadataCategory::Sequences, SEQ_MAP, raw).unwrap_err();
        assert!(err.to_string().contains("increment_by"));
    }

    #[test]
    fn test_empty_result_without_columns_is_empty_set() {
        let set =
            normalize(MetadataCategory::Sequences, SEQ_MAP, RawRowSet::default()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_transforms() {
        const CODES: &[(&str, &str)] = &[("c", "CASCADE"), ("a", "NO ACTION")];
        assert_eq!(
            apply(Transform::Decode(CODES), "c".into()),
            Ok(Value::from("CASCADE"))
        );
        assert!(apply(Transform::Decode(CODES), "z".into()).is_err());
        assert_eq!(
            apply(Transform::Flag(&["I", "J"]), "J".into()),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            apply(Transform::Flag(&["I", "J"]), Value::Null),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            apply(Transform::TrimEnd, "ORDERS    ".into()),
            Ok(Value::from("ORDERS"))
        );
    }
}
