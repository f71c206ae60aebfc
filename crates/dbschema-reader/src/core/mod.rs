//! Core abstractions for engine-independent catalog reads.
//!
//! This module provides the foundational types and traits used throughout
//! the reader:
//!
//! - [`category`]: metadata categories and their canonical column layouts
//! - [`scope`]: optional table/schema filter and per-engine scope rules
//! - [`value`]: catalog cell values and canonical coercion
//! - [`row`]: raw driver result sets and canonical row sets
//! - [`schema`]: key, sequence, identity and index descriptors
//! - [`traits`]: connection, dialect and backend contracts
//! - [`catalog`]: backend registry keyed by engine identifier
//!
//! # Architecture
//!
//! The core defines engine-independent abstractions that are implemented
//! by driver modules (`drivers/postgres`, `drivers/db2_iseries`, etc.).
//! Drivers contribute query templates and connection adapters; the core
//! owns the canonical shapes they must produce.
//!
//! # Design Patterns
//!
//! - **Registry**: `BackendCatalog` maps engine identifiers to backends
//! - **Strategy**: `Dialect` provides interchangeable parameter syntax
//! - **Fallback**: backends declare per category whether the generic query applies

pub mod catalog;
pub mod category;
pub mod row;
pub mod schema;
pub mod scope;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use catalog::{engine_key, BackendCatalog};
pub use category::{col, CanonicalColumn, CanonicalSchema, MetadataCategory, ValueKind};
pub use row::{CanonicalRow, CanonicalRowSet, RawRowSet};
pub use schema::{
    ConstraintDescriptor, ConstraintNaming, ForeignKeyDescriptor, IdentityColumnDescriptor, IndexColumn,
    IndexDescriptor, KeyColumn, ReferentialAction, SequenceDescriptor,
};
pub use scope::{ScopeFilter, ScopePolicy};
pub use traits::{BackendReader, CatalogConnection, CategorySupport, Dialect};
pub use value::{ExactNumber, Value};
