//! MySQL/MariaDB database driver.
//!
//! - [`MysqlDialect`]: bare `?` markers
//! - [`MysqlBackend`]: INFORMATION_SCHEMA with MySQL extension columns
//! - `MysqlCatalogConnection`: sqlx adapter (feature `mysql`)
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

#[cfg(feature = "mysql")]
mod connection;
mod dialect;
mod reader;

#[cfg(feature = "mysql")]
pub use connection::MysqlCatalogConnection;
pub use dialect::MysqlDialect;
pub use reader::MysqlBackend;
