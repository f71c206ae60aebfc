//! Catalog cell values.
//!
//! Catalog queries return a small set of scalar shapes: names and text,
//! integer ordinals and lengths, exact sequence bounds, and flags. Driver adapters decode native cells into [`Value`]; the
//! normalizer coerces them into the canonical kind of each column.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::ValueKind;

/// A single catalog cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    Bool(bool),
    Int(i64),
    /// Exact numeric wider than `i64` or carrying a scale.
    Decimal(Decimal),
    /// Exact numeric beyond `Decimal` range, kept as its digits.
    ///
    /// Db2 `DECIMAL(31,0)` and SQL Server `decimal(38,0)` sequences report
    /// bounds up to 10^31-1 and 10^38-1.
    Wide(String),
    Text(String),
}

/// Exact number read from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExactNumber {
    Decimal(Decimal),
    /// Digits of a value `Decimal` cannot hold.
    Digits(String),
}

impl fmt::Display for ExactNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExactNumber::Decimal(v) => write!(f, "{}", v),
            ExactNumber::Digits(v) => f.write_str(v),
        }
    }
}

impl From<Decimal> for ExactNumber {
    fn from(v: Decimal) -> Self {
        ExactNumber::Decimal(v)
    }
}

impl From<i64> for ExactNumber {
    fn from(v: i64) -> Self {
        ExactNumber::Decimal(Decimal::from(v))
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(v) => Some(*v),
            Value::Int(v) => Some(Decimal::from(*v)),
            _ => None,
        }
    }

    /// Exact numeric content, whatever its width.
    pub fn as_exact(&self) -> Option<ExactNumber> {
        match self {
            Value::Wide(v) => Some(ExactNumber::Digits(v.clone())),
            other => other.as_decimal().map(ExactNumber::Decimal),
        }
    }

    /// Short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Wide(_) => "numeric",
            Value::Text(_) => "text",
        }
    }

    /// Coerce into the given canonical kind.
    ///
    /// Text is accepted for every kind because text-buffer drivers (ODBC)
    /// return all catalog cells as strings. NULL stays NULL.
    pub fn coerce(self, kind: ValueKind) -> Result<Value, String> {
        match (kind, self) {
            (_, Value::Null) => Ok(Value::Null),

            (ValueKind::Text, Value::Text(s)) => Ok(Value::Text(s)),
            (ValueKind::Text, Value::Int(v)) => Ok(Value::Text(v.to_string())),
            (ValueKind::Text, Value::Decimal(v)) => Ok(Value::Text(v.to_string())),
            (ValueKind::Text, Value::Wide(v)) => Ok(Value::Text(v)),
            (ValueKind::Text, Value::Bool(v)) => Ok(Value::Text(v.to_string())),

            (ValueKind::Int, Value::Int(v)) => Ok(Value::Int(v)),
            (ValueKind::Int, Value::Decimal(d)) => {
                if d.fract().is_zero() {
                    d.to_i64()
                        .map(Value::Int)
                        .ok_or_else(|| format!("{} does not fit in a 64-bit integer", d))
                } else {
                    Err(format!("{} is not an integer", d))
                }
            }
            (ValueKind::Int, Value::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("'{}' is not an integer", s)),

            (ValueKind::Int, Value::Wide(v)) => {
                Err(format!("{} does not fit in a 64-bit integer", v))
            }

            (ValueKind::Numeric, Value::Decimal(d)) => Ok(Value::Decimal(d)),
            (ValueKind::Numeric, Value::Int(v)) => Ok(Value::Decimal(Decimal::from(v))),
            (ValueKind::Numeric, Value::Wide(v)) => Ok(Value::Wide(v)),
            (ValueKind::Numeric, Value::Text(s)) => {
                parse_exact(&s).ok_or_else(|| format!("'{}' is not a number", s))
            }

            (ValueKind::Bool, Value::Bool(v)) => Ok(Value::Bool(v)),
            (ValueKind::Bool, Value::Int(v)) => match v {
                0 => Ok(Value::Bool(false)),
                1 => Ok(Value::Bool(true)),
                other => Err(format!("{} is not a flag", other)),
            },
            (ValueKind::Bool, Value::Text(s)) => parse_flag(&s)
                .map(Value::Bool)
                .ok_or_else(|| format!("'{}' is not a flag", s)),

            (kind, other) => Err(format!(
                "{} value cannot be read as {:?}",
                other.type_name(),
                kind
            )),
        }
    }
}

/// Most significant digits `Decimal` holds without rounding.
const DECIMAL_DIGITS: usize = 28;

/// Parse a plain decimal literal (`-123`, `+4.50`) without losing digits.
///
/// Literals too wide for `Decimal` become [`Value::Wide`] with the leading
/// `+` and leading zeros removed.
fn parse_exact(s: &str) -> Option<Value> {
    let t = s.trim();
    let (negative, unsigned) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
        return None;
    }
    if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
        return None;
    }

    let int_part = int_part.trim_start_matches('0');
    let significant = int_part.len() + frac_part.map_or(0, str::len);
    if significant <= DECIMAL_DIGITS {
        return Decimal::from_str(t.trim_start_matches('+'))
            .ok()
            .map(Value::Decimal);
    }

    let mut digits = String::with_capacity(significant + 3);
    if negative {
        digits.push('-');
    }
    digits.push_str(if int_part.is_empty() { "0" } else { int_part });
    if let Some(frac) = frac_part.filter(|f| !f.is_empty()) {
        digits.push('.');
        digits.push_str(frac);
    }
    Some(Value::Wide(digits))
}

/// Parse the textual flag spellings catalogs use.
fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_uppercase().as_str() {
        "Y" | "YES" | "1" | "T" | "TRUE" => Some(true),
        "N" | "NO" | "0" | "F" | "FALSE" => Some(false),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Wide(v) => f.write_str(v),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_coerces_to_every_kind() {
        assert_eq!(Value::from(" 12 ").coerce(ValueKind::Int), Ok(Value::Int(12)));
        assert_eq!(
            Value::from("9999999999999999999999999999").coerce(ValueKind::Numeric),
            Ok(Value::Decimal(
                Decimal::from_str("9999999999999999999999999999").unwrap()
            ))
        );
        assert_eq!(Value::from("Y").coerce(ValueKind::Bool), Ok(Value::Bool(true)));
        assert_eq!(Value::from("no").coerce(ValueKind::Bool), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_bounds_beyond_decimal_range_keep_their_digits() {
        let db2_max = "9".repeat(31);
        let mssql_min = format!("-{}", "9".repeat(38));
        assert_eq!(
            Value::from(db2_max.as_str()).coerce(ValueKind::Numeric),
            Ok(Value::Wide(db2_max.clone()))
        );
        assert_eq!(
            Value::from(format!(" {} ", mssql_min)).coerce(ValueKind::Numeric),
            Ok(Value::Wide(mssql_min.clone()))
        );
        assert_eq!(
            Value::from(format!("+000{}", db2_max)).coerce(ValueKind::Numeric),
            Ok(Value::Wide(db2_max.clone()))
        );
        assert_eq!(
            Value::Wide(db2_max.clone()).as_exact(),
            Some(ExactNumber::Digits(db2_max))
        );
        assert!(Value::Wide(mssql_min).coerce(ValueKind::Int).is_err());
    }

    #[test]
    fn test_numeric_literals_within_range_stay_decimal() {
        assert_eq!(
            Value::from("+4.50").coerce(ValueKind::Numeric),
            Ok(Value::Decimal(Decimal::new(450, 2)))
        );
        assert_eq!(
            Value::from("-1").coerce(ValueKind::Numeric),
            Ok(Value::Decimal(Decimal::from(-1)))
        );
        assert_eq!(
            Value::Int(7).as_exact(),
            Some(ExactNumber::Decimal(Decimal::from(7)))
        );
        for bad in ["", "-", ".", "1e5", "12a", "1.2.3", "--1"] {
            assert!(
                Value::from(bad).coerce(ValueKind::Numeric).is_err(),
                "{:?}",
                bad
            );
        }
    }

    #[test]
    fn test_null_survives_coercion() {
        for kind in [
            ValueKind::Text,
            ValueKind::Int,
            ValueKind::Numeric,
            ValueKind::Bool,
        ] {
            assert_eq!(Value::Null.coerce(kind), Ok(Value::Null));
        }
    }

    #[test]
    fn test_decimal_to_int_requires_integral_value() {
        assert_eq!(
            Value::Decimal(Decimal::new(30, 0)).coerce(ValueKind::Int),
            Ok(Value::Int(30))
        );
        assert!(Value::Decimal(Decimal::new(15, 1))
            .coerce(ValueKind::Int)
            .is_err());
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Value::from("abc").coerce(ValueKind::Int).is_err());
        assert!(Value::Int(2).coerce(ValueKind::Bool).is_err());
        assert!(Value::Bool(true).coerce(ValueKind::Numeric).is_err());
    }

    #[test]
    fn test_option_into_value() {
        let none: Option<&str> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(5i64)), Value::Int(5));
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Int(1),
            Value::from("PK_ORDERS"),
            Value::Bool(true),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,1,"PK_ORDERS",true]"#);
    }
}
