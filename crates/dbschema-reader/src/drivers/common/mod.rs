//! Connection adapters shared across engines.
//!
//! - `odbc`: text-buffer ODBC adapter used for Db2 for i and for any engine
//!   reached through the generic backend (feature `odbc`)

#[cfg(feature = "odbc")]
mod odbc;

#[cfg(feature = "odbc")]
pub use odbc::OdbcCatalogConnection;
