//! Db2 for i SQL dialect (Strategy pattern).

use crate::core::traits::Dialect;

/// Db2 for i dialect implementation.
///
/// Db2 rejects an untyped marker in `? IS NULL` (SQL0418), so every scope
/// marker is cast to the catalog's name type.
#[derive(Debug, Clone, Default)]
pub struct Db2ISeriesDialect;

impl Db2ISeriesDialect {
    /// Create a new Db2 for i dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for Db2ISeriesDialect {
    fn name(&self) -> &str {
        "db2-iseries"
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn typed_param(&self, index: usize) -> String {
        format!("CAST({} AS VARCHAR(128))", self.param_placeholder(index))
    }
}
