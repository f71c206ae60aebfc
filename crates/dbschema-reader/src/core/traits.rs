//! Core traits for engine-independent catalog reads.
//!
//! - [`CatalogConnection`]: an open connection able to run a bound query
//! - [`Dialect`]: parameter-marker syntax of an engine/driver pair
//! - [`BackendReader`]: the per-engine capability contract
//!
//! # Design Patterns
//!
//! - **Strategy**: `Dialect` provides interchangeable parameter syntax
//! - **Tagged variants**: engines are enum variants of `BackendImpl`, each
//!   declaring per category whether it overrides, falls back, or opts out

use async_trait::async_trait;

use crate::error::DriverError;
use crate::query::{BoundQuery, QueryTemplate};

use super::category::MetadataCategory;
use super::row::RawRowSet;
use super::schema::ConstraintNaming;
use super::scope::ScopePolicy;

/// An open, already-connected handle that can run read-only queries.
///
/// Implementations never open, close, or commit: the caller owns the
/// connection's lifetime. The whole result is returned at once, so a
/// failure mid-stream surfaces as an error rather than a truncated set.
#[async_trait]
pub trait CatalogConnection: Send + Sync {
    /// Execute a bound query and return every row.
    async fn fetch(&self, query: &BoundQuery) -> Result<RawRowSet, DriverError>;
}

/// Parameter syntax for an engine.
///
/// This is a **Strategy** - different implementations provide
/// interchangeable placeholder rules.
pub trait Dialect: Send + Sync {
    /// Get the dialect identifier (e.g., "db2-iseries", "postgres").
    fn name(&self) -> &str;

    /// Get a parameter placeholder for the given 1-based index.
    ///
    /// - PostgreSQL: `$1`, `$2`, etc.
    /// - SQL Server: `@P1`, `@P2`, etc.
    /// - ODBC and MySQL: `?`
    fn param_placeholder(&self, index: usize) -> String;

    /// Placeholder carrying an explicit character type.
    ///
    /// Engines that cannot infer the type of a bare marker in `? IS NULL`
    /// (Db2, PostgreSQL) wrap it in a cast.
    fn typed_param(&self, index: usize) -> String {
        self.param_placeholder(index)
    }
}

/// How a backend handles one metadata category.
#[derive(Debug, Clone, Copy)]
pub enum CategorySupport {
    /// The backend supplies its own catalog query.
    Native(&'static QueryTemplate),
    /// The generic INFORMATION_SCHEMA query is correct for this engine.
    Generic,
    /// The engine has no such concept; reads return an empty set.
    Unsupported,
}

/// Per-engine capability contract.
///
/// A backend overrides any subset of categories; the rest fall back to
/// the generic reader.
pub trait BackendReader: Send + Sync {
    /// Engine identifier (e.g., "db2-iseries").
    fn engine(&self) -> &str;

    /// Parameter syntax used for every query run on this engine,
    /// including generic fallbacks.
    fn dialect(&self) -> &dyn Dialect;

    /// Route for a category.
    fn support(&self, category: MetadataCategory) -> CategorySupport;

    /// Scope rules this engine enforces.
    fn scope_policy(&self) -> ScopePolicy {
        ScopePolicy::Independent
    }

    /// Namespace within which the engine keeps constraint names unique.
    fn constraint_naming(&self) -> ConstraintNaming {
        ConstraintNaming::Schema
    }
}
