//! Microsoft SQL Server driver.
//!
//! - [`MssqlDialect`]: named `@Pn` markers
//! - [`MssqlBackend`]: sys.* catalog templates, generic fallback for the rest
//! - `MssqlCatalogConnection`: Tiberius adapter (feature `mssql`)

#[cfg(feature = "mssql")]
mod connection;
mod dialect;
mod reader;

#[cfg(feature = "mssql")]
pub use connection::MssqlCatalogConnection;
pub use dialect::MssqlDialect;
pub use reader::MssqlBackend;
