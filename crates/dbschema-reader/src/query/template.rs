//! Immutable per-backend query templates.
//!
//! A template pairs catalog SQL with the columns its scope filter applies
//! to and a column map describing how native result columns land in the
//! canonical layout. Templates are `static` data; nothing about them
//! changes at runtime.

use crate::core::MetadataCategory;

/// Marker replaced by the bound scope predicate.
pub const SCOPE_MARKER: &str = "{scope}";

/// Value rewrite applied to a native cell before coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    None,
    /// Strip blank padding from fixed-width CHAR catalog columns.
    TrimEnd,
    /// Map single-character or short codes to canonical words.
    Decode(&'static [(&'static str, &'static str)]),
    /// True when the value is one of the codes; NULL counts as false.
    Flag(&'static [&'static str]),
}

/// Where a canonical column comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub canonical: &'static str,
    /// Native result column, or `None` when the engine has no such concept.
    pub native: Option<&'static str>,
    pub transform: Transform,
}

impl ColumnMap {
    /// Canonical column read from a differently named native column.
    pub const fn named(canonical: &'static str, native: &'static str) -> Self {
        Self {
            canonical,
            native: Some(native),
            transform: Transform::None,
        }
    }

    /// Native column already aliased to the canonical name.
    pub const fn same(canonical: &'static str) -> Self {
        Self::named(canonical, canonical)
    }

    /// Canonical column the engine cannot supply; always NULL.
    pub const fn absent(canonical: &'static str) -> Self {
        Self {
            canonical,
            native: None,
            transform: Transform::None,
        }
    }

    pub const fn trimmed(mut self) -> Self {
        self.transform = Transform::TrimEnd;
        self
    }

    pub const fn decoded(mut self, codes: &'static [(&'static str, &'static str)]) -> Self {
        self.transform = Transform::Decode(codes);
        self
    }

    pub const fn flag(mut self, codes: &'static [&'static str]) -> Self {
        self.transform = Transform::Flag(codes);
        self
    }
}

/// Catalog query for one category on one backend.
#[derive(Debug)]
pub struct QueryTemplate {
    pub category: MetadataCategory,
    /// SQL text containing [`SCOPE_MARKER`] exactly once.
    pub sql: &'static str,
    /// Column compared against the scope's table name.
    pub table_column: Option<&'static str>,
    /// Column compared against the scope's schema name.
    pub schema_column: Option<&'static str>,
    /// Mapping for every canonical column of `category`.
    pub columns: &'static [ColumnMap],
}

/// Referential action codes shared by catalogs that store them as words
/// with underscores or spaces; canonical spelling uses spaces.
pub const RULE_WORDS: &[(&str, &str)] = &[
    ("NO ACTION", "NO ACTION"),
    ("NO_ACTION", "NO ACTION"),
    ("RESTRICT", "RESTRICT"),
    ("CASCADE", "CASCADE"),
    ("SET NULL", "SET NULL"),
    ("SET_NULL", "SET NULL"),
    ("SET DEFAULT", "SET DEFAULT"),
    ("SET_DEFAULT", "SET DEFAULT"),
];
