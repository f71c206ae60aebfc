//! ANSI SQL dialect (Strategy pattern).
//!
//! Positional `?` markers, as used by ODBC and most generic drivers.

use crate::core::traits::Dialect;

/// Dialect for engines reached through a generic driver.
///
/// Markers carry a character cast so `? IS NULL` type-checks on engines
/// that refuse untyped parameters.
#[derive(Debug, Clone, Default)]
pub struct GenericDialect;

impl GenericDialect {
    /// Create a new generic dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &str {
        "generic"
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn typed_param(&self, index: usize) -> String {
        format!("CAST({} AS VARCHAR(128))", self.param_placeholder(index))
    }
}
