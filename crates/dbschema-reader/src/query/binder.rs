//! Scope filter binding.
//!
//! Every optional dimension is rendered as a parenthesized two-branch
//! predicate, `(column = p OR p IS NULL)`, and bound even when unset. An
//! unset dimension binds NULL, so the second branch matches every row.
//! The parentheses keep each clause independent when clauses are joined
//! with `AND` against each other or against the template's own conditions.

use crate::core::{Dialect, ScopeFilter};

use super::template::{QueryTemplate, SCOPE_MARKER};

/// SQL text with its positional parameter values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub sql: String,
    /// Values in placeholder order; `None` binds SQL NULL.
    pub params: Vec<Option<String>>,
}

/// Builds parameter lists for one query.
///
/// Each placeholder occurrence gets its own parameter so the same code
/// works for numbered (`$1`, `@P1`) and positional (`?`) markers.
pub struct ParameterBinder<'d, D: Dialect + ?Sized> {
    dialect: &'d D,
    params: Vec<Option<String>>,
}

impl<'d, D: Dialect + ?Sized> ParameterBinder<'d, D> {
    pub fn new(dialect: &'d D) -> Self {
        Self {
            dialect,
            params: Vec::new(),
        }
    }

    /// Push a value and return its placeholder.
    fn push(&mut self, value: Option<&str>) -> String {
        self.params.push(value.map(str::to_string));
        self.dialect.typed_param(self.params.len())
    }

    /// `(column = p OR p IS NULL)` for an optional value.
    pub fn optional_equals(&mut self, column: &str, value: Option<&str>) -> String {
        let equals = self.push(value);
        let unset = self.push(value);
        format!("({} = {} OR {} IS NULL)", column, equals, unset)
    }

    /// Scope predicate for a template: one clause per filterable
    /// dimension, joined with AND. Templates without filter columns get
    /// a tautology so the surrounding SQL stays valid.
    pub fn scope_predicate(&mut self, template: &QueryTemplate, scope: &ScopeFilter) -> String {
        let mut clauses = Vec::with_capacity(2);
        if let Some(column) = template.table_column {
            clauses.push(self.optional_equals(column, scope.table.as_deref()));
        }
        if let Some(column) = template.schema_column {
            clauses.push(self.optional_equals(column, scope.schema.as_deref()));
        }
        if clauses.is_empty() {
            "1 = 1".to_string()
        } else {
            clauses.join(" AND ")
        }
    }

    /// Render a template for a scope.
    pub fn bind(mut self, template: &QueryTemplate, scope: &ScopeFilter) -> BoundQuery {
        let predicate = self.scope_predicate(template, scope);
        BoundQuery {
            sql: template.sql.replacen(SCOPE_MARKER, &predicate, 1),
            params: self.params,
        }
    }
}
