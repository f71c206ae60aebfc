//! MySQL/MariaDB SQL dialect (Strategy pattern).

use crate::core::traits::Dialect;

/// MySQL/MariaDB dialect implementation.
///
/// Markers stay bare: a cast would give the parameter the connection
/// collation and clash with INFORMATION_SCHEMA's utf8 columns.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &str {
        "mysql"
    }

    fn param_placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}
