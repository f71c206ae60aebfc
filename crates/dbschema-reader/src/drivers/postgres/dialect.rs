//! PostgreSQL SQL dialect (Strategy pattern).
//!
//! Provides PostgreSQL-specific parameter placeholders.

use crate::core::traits::Dialect;

/// PostgreSQL dialect implementation.
///
/// Implements the Strategy pattern for SQL syntax differences.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &str {
        "postgres"
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    /// `$n::text`: without the cast a marker compared only with `IS NULL`
    /// has no inferable type.
    fn typed_param(&self, index: usize) -> String {
        format!("{}::text", self.param_placeholder(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_placeholder() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.param_placeholder(1), "$1");
        assert_eq!(dialect.param_placeholder(10), "$10");
    }

    #[test]
    fn test_typed_param() {
        let dialect = PostgresDialect::new();
        assert_eq!(dialect.typed_param(4), "$4::text");
    }
}
