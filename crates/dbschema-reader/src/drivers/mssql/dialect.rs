//! MSSQL SQL dialect (Strategy pattern).
//!
//! Provides MSSQL-specific parameter placeholders.

use crate::core::traits::Dialect;

/// Microsoft SQL Server dialect implementation.
///
/// Tiberius declares every bound parameter with its type, so markers need
/// no cast.
#[derive(Debug, Clone, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Create a new MSSQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MssqlDialect {
    fn name(&self) -> &str {
        "mssql"
    }

    fn param_placeholder(&self, index: usize) -> String {
        format!("@P{}", index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_placeholder() {
        let dialect = MssqlDialect::new();
        assert_eq!(dialect.param_placeholder(1), "@P1");
        assert_eq!(dialect.param_placeholder(10), "@P10");
        assert_eq!(dialect.typed_param(3), "@P3");
    }
}
