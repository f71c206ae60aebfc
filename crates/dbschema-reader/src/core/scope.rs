//! Optional table/schema scope for a catalog read.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Optional table name and schema/owner name restricting a read.
///
/// `None` in either dimension matches every value of that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// Table name, or `None` for all tables.
    #[serde(default)]
    pub table: Option<String>,

    /// Schema/owner name, or `None` for all schemas.
    #[serde(default)]
    pub schema: Option<String>,
}

impl ScopeFilter {
    /// Match every table in every schema.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match one table name in any schema.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            schema: None,
        }
    }

    /// Match every table in one schema.
    pub fn schema(schema: impl Into<String>) -> Self {
        Self {
            table: None,
            schema: Some(schema.into()),
        }
    }

    /// Restrict to a schema.
    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.table.is_none() && self.schema.is_none()
    }
}

impl fmt::Display for ScopeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(table={}, schema={})",
            self.table.as_deref().unwrap_or("*"),
            self.schema.as_deref().unwrap_or("*")
        )
    }
}

/// How strictly an engine treats the two scope dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
    /// Table and schema filters are applied independently.
    #[default]
    Independent,
    /// A table filter is only accepted together with a schema filter.
    TableRequiresSchema,
}

impl ScopePolicy {
    /// Check a scope against this policy.
    ///
    /// Returns the reason the scope is rejected, if it is.
    pub fn check(&self, scope: &ScopeFilter) -> Result<(), String> {
        if scope.table.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("table name is empty; omit it to match all tables".into());
        }
        if scope.schema.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err("schema name is empty; omit it to match all schemas".into());
        }
        if *self == ScopePolicy::TableRequiresSchema
            && scope.table.is_some()
            && scope.schema.is_none()
        {
            return Err("this engine requires a schema whenever a table is given".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_marks_wildcards() {
        assert_eq!(ScopeFilter::all().to_string(), "(table=*, schema=*)");
        assert_eq!(
            ScopeFilter::table("ORDERS").in_schema("SALES").to_string(),
            "(table=ORDERS, schema=SALES)"
        );
    }

    #[test]
    fn test_independent_policy_accepts_partial_scopes() {
        let policy = ScopePolicy::Independent;
        assert!(policy.check(&ScopeFilter::all()).is_ok());
        assert!(policy.check(&ScopeFilter::table("ORDERS")).is_ok());
        assert!(policy.check(&ScopeFilter::schema("SALES")).is_ok());
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let policy = ScopePolicy::Independent;
        assert!(policy.check(&ScopeFilter::table("  ")).is_err());
        assert!(policy.check(&ScopeFilter::schema("")).is_err());
    }

    #[test]
    fn test_table_requires_schema_policy() {
        let policy = ScopePolicy::TableRequiresSchema;
        assert!(policy.check(&ScopeFilter::table("ORDERS")).is_err());
        assert!(policy
            .check(&ScopeFilter::table("ORDERS").in_schema("SALES"))
            .is_ok());
        assert!(policy.check(&ScopeFilter::schema("SALES")).is_ok());
        assert!(policy.check(&ScopeFilter::all()).is_ok());
    }
}
