//! Database backend implementations.
//!
//! This module provides engine-specific implementations of the core traits:
//!
//! - [`generic`]: ANSI INFORMATION_SCHEMA fallback
//! - [`db2_iseries`]: Db2 for i (QSYS2 catalog)
//! - [`postgres`]: PostgreSQL (pg_catalog)
//! - [`mssql`]: Microsoft SQL Server (sys.* catalog views)
//! - [`mysql`]: MySQL and MariaDB
//! - [`common`]: Shared connection adapters
//!
//! # Architecture
//!
//! Each backend module provides:
//! - `Dialect`: parameter-marker syntax for the engine
//! - a backend type implementing `BackendReader`, whose static query
//!   templates override the generic fallback per category
//! - a `CatalogConnection` adapter for the engine's driver, behind the
//!   driver's Cargo feature
//!
//! Templates are always compiled in; only the connection adapters need a
//! driver crate.
//!
//! # Adding New Engines
//!
//! 1. Create a new module under `drivers/` (e.g., `drivers/oracle/`)
//! 2. Implement `Dialect` and `BackendReader`
//! 3. Add enum variants to `DialectImpl` and `BackendImpl`
//! 4. List the engine and its aliases in [`BUILTIN_ENGINES`]
//! 5. Gate the connection adapter with a feature flag in `Cargo.toml`

pub mod common;
pub mod db2_iseries;
pub mod generic;
pub mod mssql;
pub mod mysql;
pub mod postgres;

pub use db2_iseries::{Db2ISeriesBackend, Db2ISeriesDialect};
pub use generic::{GenericBackend, GenericDialect};
pub use mssql::{MssqlBackend, MssqlDialect};
pub use mysql::{MysqlBackend, MysqlDialect};
pub use postgres::{PostgresBackend, PostgresDialect};

#[cfg(feature = "odbc")]
pub use common::OdbcCatalogConnection;
#[cfg(feature = "mssql")]
pub use mssql::MssqlCatalogConnection;
#[cfg(feature = "mysql")]
pub use mysql::MysqlCatalogConnection;

use crate::core::{
    BackendReader, CategorySupport, ConstraintNaming, Dialect, MetadataCategory, ScopePolicy,
};
use crate::error::{ReaderError, Result};

/// Canonical engine names with the alternative spellings each accepts.
pub const BUILTIN_ENGINES: &[(&str, &[&str])] = &[
    (
        "db2-iseries",
        &["db2i", "db2_iseries", "iseries", "as400", "db2400"],
    ),
    ("generic", &["ansi", "information_schema"]),
    ("mssql", &["sqlserver", "sql_server"]),
    ("mysql", &["mariadb"]),
    ("postgres", &["postgresql", "pg"]),
];

/// Canonical engine name for an identifier or alias, ignoring case and
/// any version suffix.
pub fn canonical_engine(engine_id: &str) -> Option<&'static str> {
    let key = crate::core::engine_key(engine_id);
    BUILTIN_ENGINES
        .iter()
        .find(|(name, aliases)| *name == key || aliases.contains(&key.as_str()))
        .map(|(name, _)| *name)
}

/// Enum-based static dispatch for dialects.
///
/// Note: We use a manual impl instead of a dispatch macro; the compiler
/// generates the same match either way.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Generic(GenericDialect),
    Db2ISeries(Db2ISeriesDialect),
    Postgres(PostgresDialect),
    Mssql(MssqlDialect),
    Mysql(MysqlDialect),
}

impl Dialect for DialectImpl {
    fn name(&self) -> &str {
        match self {
            DialectImpl::Generic(d) => d.name(),
            DialectImpl::Db2ISeries(d) => d.name(),
            DialectImpl::Postgres(d) => d.name(),
            DialectImpl::Mssql(d) => d.name(),
            DialectImpl::Mysql(d) => d.name(),
        }
    }

    fn param_placeholder(&self, index: usize) -> String {
        match self {
            DialectImpl::Generic(d) => d.param_placeholder(index),
            DialectImpl::Db2ISeries(d) => d.param_placeholder(index),
            DialectImpl::Postgres(d) => d.param_placeholder(index),
            DialectImpl::Mssql(d) => d.param_placeholder(index),
            DialectImpl::Mysql(d) => d.param_placeholder(index),
        }
    }

    fn typed_param(&self, index: usize) -> String {
        match self {
            DialectImpl::Generic(d) => d.typed_param(index),
            DialectImpl::Db2ISeries(d) => d.typed_param(index),
            DialectImpl::Postgres(d) => d.typed_param(index),
            DialectImpl::Mssql(d) => d.typed_param(index),
            DialectImpl::Mysql(d) => d.typed_param(index),
        }
    }
}

impl DialectImpl {
    /// Create a dialect implementation from an engine identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not recognized.
    pub fn from_engine(engine_id: &str) -> Result<Self> {
        match canonical_engine(engine_id) {
            Some("generic") => Ok(DialectImpl::Generic(GenericDialect::new())),
            Some("db2-iseries") => Ok(DialectImpl::Db2ISeries(Db2ISeriesDialect::new())),
            Some("postgres") => Ok(DialectImpl::Postgres(PostgresDialect::new())),
            Some("mssql") => Ok(DialectImpl::Mssql(MssqlDialect::new())),
            Some("mysql") => Ok(DialectImpl::Mysql(MysqlDialect::new())),
            _ => Err(unknown_engine(engine_id)),
        }
    }
}

/// Enum-based static dispatch for backends.
#[derive(Debug, Clone)]
pub enum BackendImpl {
    Generic(GenericBackend),
    Db2ISeries(Db2ISeriesBackend),
    Postgres(PostgresBackend),
    Mssql(MssqlBackend),
    Mysql(MysqlBackend),
}

impl BackendReader for BackendImpl {
    fn engine(&self) -> &str {
        match self {
            BackendImpl::Generic(b) => b.engine(),
            BackendImpl::Db2ISeries(b) => b.engine(),
            BackendImpl::Postgres(b) => b.engine(),
            BackendImpl::Mssql(b) => b.engine(),
            BackendImpl::Mysql(b) => b.engine(),
        }
    }

    fn dialect(&self) -> &dyn Dialect {
        match self {
            BackendImpl::Generic(b) => b.dialect(),
            BackendImpl::Db2ISeries(b) => b.dialect(),
            BackendImpl::Postgres(b) => b.dialect(),
            BackendImpl::Mssql(b) => b.dialect(),
            BackendImpl::Mysql(b) => b.dialect(),
        }
    }

    fn support(&self, category: MetadataCategory) -> CategorySupport {
        match self {
            BackendImpl::Generic(b) => b.support(category),
            BackendImpl::Db2ISeries(b) => b.support(category),
            BackendImpl::Postgres(b) => b.support(category),
            BackendImpl::Mssql(b) => b.support(category),
            BackendImpl::Mysql(b) => b.support(category),
        }
    }

    fn scope_policy(&self) -> ScopePolicy {
        match self {
            BackendImpl::Generic(b) => b.scope_policy(),
            BackendImpl::Db2ISeries(b) => b.scope_policy(),
            BackendImpl::Postgres(b) => b.scope_policy(),
            BackendImpl::Mssql(b) => b.scope_policy(),
            BackendImpl::Mysql(b) => b.scope_policy(),
        }
    }

    fn constraint_naming(&self) -> ConstraintNaming {
        match self {
            BackendImpl::Generic(b) => b.constraint_naming(),
            BackendImpl::Db2ISeries(b) => b.constraint_naming(),
            BackendImpl::Postgres(b) => b.constraint_naming(),
            BackendImpl::Mssql(b) => b.constraint_naming(),
            BackendImpl::Mysql(b) => b.constraint_naming(),
        }
    }
}

impl BackendImpl {
    /// Built-in backend for a canonical engine name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "generic" => Some(BackendImpl::Generic(GenericBackend::new())),
            "db2-iseries" => Some(BackendImpl::Db2ISeries(Db2ISeriesBackend::new())),
            "postgres" => Some(BackendImpl::Postgres(PostgresBackend::new())),
            "mssql" => Some(BackendImpl::Mssql(MssqlBackend::new())),
            "mysql" => Some(BackendImpl::Mysql(MysqlBackend::new())),
            _ => None,
        }
    }

    /// Create a backend from an engine identifier or alias.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not recognized.
    pub fn from_engine(engine_id: &str) -> Result<Self> {
        canonical_engine(engine_id)
            .and_then(Self::builtin)
            .ok_or_else(|| unknown_engine(engine_id))
    }
}

fn unknown_engine(engine_id: &str) -> ReaderError {
    let supported: Vec<&str> = BUILTIN_ENGINES.iter().map(|(name, _)| *name).collect();
    ReaderError::Config(format!(
        "Unknown database engine: '{}'. Supported engines: {}",
        engine_id,
        supported.join(", ")
    ))
}
