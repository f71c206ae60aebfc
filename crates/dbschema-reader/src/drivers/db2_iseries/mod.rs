//! Db2 for i backend.
//!
//! - [`Db2ISeriesDialect`]: positional markers cast to `VARCHAR(128)`
//! - [`Db2ISeriesBackend`]: QSYS2 catalog templates for every category
//!
//! Connections go through ODBC (`OdbcCatalogConnection`, feature `odbc`).

mod dialect;
mod reader;

pub use dialect::Db2ISeriesDialect;
pub use reader::Db2ISeriesBackend;
