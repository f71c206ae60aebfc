//! PostgreSQL driver.
//!
//! - [`PostgresDialect`]: numbered `$n::text` markers
//! - [`PostgresBackend`]: pg_catalog templates, generic fallback for the rest
//!
//! With the `postgres` feature, `tokio_postgres::Client` implements
//! [`CatalogConnection`](crate::core::CatalogConnection) directly.

#[cfg(feature = "postgres")]
mod connection;
mod dialect;
mod reader;

pub use dialect::PostgresDialect;
pub use reader::PostgresBackend;
