//! # dbschema-reader
//!
//! Reads structural metadata from relational database catalogs and
//! normalizes it into one engine-independent model.
//!
//! Each engine keeps tables, keys, sequences and indexes in its own catalog
//! views under its own column names. This library hides that behind:
//!
//! - **Canonical layouts**: one fixed column schema per metadata category
//! - **Backends**: per-engine query templates that override a generic
//!   INFORMATION_SCHEMA fallback category by category
//! - **Scope binding**: optional table/schema filters where an unset
//!   dimension is a true wildcard
//! - **Assembly**: one-row-per-column key catalogs folded into ordered
//!   constraint, foreign-key and index descriptors
//!
//! The caller owns the connection. The library only issues read-only
//! queries over it and never caches results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbschema_reader::{BackendCatalog, ScopeFilter, SchemaReader};
//!
//! # async fn run(conn: &dyn dbschema_reader::CatalogConnection) -> dbschema_reader::Result<()> {
//! let reader = SchemaReader::for_engine(&BackendCatalog::with_builtins(), "postgres@16")?;
//! let keys = reader
//!     .primary_keys(conn, &ScopeFilter::table("orders").in_schema("public"))
//!     .await?;
//! for key in keys {
//!     println!("{} on {}: {:?}", key.name, key.table, key.column_names());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod normalize;
pub mod orchestrator;
pub mod query;

// Re-exports for convenient access
pub use crate::config::{Config, ConnectionConfig};
pub use crate::core::{
    BackendCatalog, BackendReader, ExactNumber, CanonicalRow, CanonicalRowSet, CatalogConnection,
    ConstraintDescriptor, ForeignKeyDescriptor, IdentityColumnDescriptor, IndexDescriptor,
    MetadataCategory, RawRowSet, ScopeFilter, ScopePolicy, SequenceDescriptor, Value,
};
pub use crate::error::{DriverError, ReaderError, Result};
pub use crate::orchestrator::{ReadPlan, Route, SchemaReader};
