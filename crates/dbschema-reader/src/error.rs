//! Error types for catalog reads.

use thiserror::Error;

use crate::core::{MetadataCategory, ScopeFilter};

/// Exit code for configuration problems.
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for a rejected scope filter.
pub const EXIT_SCOPE_ERROR: u8 = 2;
/// Exit code for a failed catalog query.
pub const EXIT_QUERY_ERROR: u8 = 3;
/// Exit code for a result shape that could not be normalized.
pub const EXIT_NORMALIZATION_ERROR: u8 = 4;
/// Exit code for inconsistent catalog state.
pub const EXIT_INTEGRITY_ERROR: u8 = 5;
/// Exit code for a cancelled read.
pub const EXIT_CANCELLED: u8 = 6;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;
/// Exit code for a connection that could not be opened.
pub const EXIT_CONNECT_ERROR: u8 = 8;

/// Errors raised by a database driver while running a catalog query.
///
/// Driver adapters convert their native errors into this type; the
/// orchestrator attaches the category and scope before surfacing it.
#[derive(Error, Debug)]
pub enum DriverError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "mssql")]
    #[error("SQL Server: {0}")]
    Mssql(#[from] tiberius::error::Error),

    #[cfg(feature = "mysql")]
    #[error("MySQL: {0}")]
    Mysql(#[from] sqlx::Error),

    #[cfg(feature = "odbc")]
    #[error("ODBC: {0}")]
    Odbc(#[from] odbc_api::Error),

    /// A column value the adapter cannot represent.
    #[error("cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// The connection is not usable (closed, poisoned, never opened).
    #[error("connection unavailable: {0}")]
    Unavailable(String),
}

impl DriverError {
    /// Create a Decode error.
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        DriverError::Decode {
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Main error type for catalog reads.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The scope filter is malformed for the selected engine.
    #[error("Invalid scope {scope} for {category}: {message}")]
    Scope {
        category: MetadataCategory,
        scope: ScopeFilter,
        message: String,
    },

    /// The catalog query failed.
    #[error("Query for {category} with scope {scope} failed")]
    QueryExecution {
        category: MetadataCategory,
        scope: ScopeFilter,
        #[source]
        source: DriverError,
    },

    /// A backend returned rows that do not fit the canonical schema.
    #[error("Cannot normalize {category} rows: {message}")]
    Normalization {
        category: MetadataCategory,
        message: String,
    },

    /// The catalog is internally inconsistent.
    #[error("Inconsistent catalog for {category} constraint {constraint}: {message}")]
    Integrity {
        category: MetadataCategory,
        constraint: String,
        message: String,
    },

    /// Configuration error (invalid YAML, unknown engine, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A connection could not be opened. Only raised by callers that own
    /// the connection lifecycle; reads never open connections.
    #[error("Cannot connect to {engine}")]
    Connect {
        engine: String,
        #[source]
        source: DriverError,
    },

    /// The read was cancelled before the query completed.
    #[error("Catalog read cancelled")]
    Cancelled,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReaderError {
    /// Create a Normalization error.
    pub fn normalization(category: MetadataCategory, message: impl Into<String>) -> Self {
        ReaderError::Normalization {
            category,
            message: message.into(),
        }
    }

    /// Create an Integrity error for one constraint group.
    pub fn integrity(
        category: MetadataCategory,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ReaderError::Integrity {
            category,
            constraint: constraint.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReaderError::Config(_) | ReaderError::Yaml(_) | ReaderError::Json(_) => {
                EXIT_CONFIG_ERROR
            }
            ReaderError::Scope { .. } => EXIT_SCOPE_ERROR,
            ReaderError::QueryExecution { .. } => EXIT_QUERY_ERROR,
            ReaderError::Normalization { .. } => EXIT_NORMALIZATION_ERROR,
            ReaderError::Integrity { .. } => EXIT_INTEGRITY_ERROR,
            ReaderError::Cancelled => EXIT_CANCELLED,
            ReaderError::Io(_) => EXIT_IO_ERROR,
            ReaderError::Connect { .. } => EXIT_CONNECT_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for catalog reads.
pub type Result<T> = std::result::Result<T, ReaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let scope = ScopeFilter::all();
        let errors = [
            ReaderError::Config("x".into()),
            ReaderError::Scope {
                category: MetadataCategory::Tables,
                scope: scope.clone(),
                message: "x".into(),
            },
            ReaderError::QueryExecution {
                category: MetadataCategory::Tables,
                scope,
                source: DriverError::Unavailable("closed".into()),
            },
            ReaderError::normalization(MetadataCategory::Tables, "x"),
            ReaderError::integrity(MetadataCategory::ForeignKeys, "FK_A", "x"),
            ReaderError::Cancelled,
            ReaderError::Connect {
                engine: "mysql".into(),
                source: DriverError::Unavailable("refused".into()),
            },
        ];
        let codes: Vec<u8> = errors.iter().map(ReaderError::exit_code).collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 8]);
    }

    #[test]
    fn test_format_detailed_includes_driver_cause() {
        let err = ReaderError::QueryExecution {
            category: MetadataCategory::PrimaryKeys,
            scope: ScopeFilter::table("ORDERS"),
            source: DriverError::Unavailable("socket closed".into()),
        };
        let detailed = err.format_detailed();
        assert!(detailed.contains("primary_keys"));
        assert!(detailed.contains("table=ORDERS"));
        assert!(detailed.contains("Caused by:"));
        assert!(detailed.contains("socket closed"));
    }
}
