//! Generic INFORMATION_SCHEMA backend.
//!
//! - [`GenericDialect`]: positional markers with a character cast
//! - [`GenericBackend`]: the fallback every other backend builds on

mod dialect;
mod reader;

pub use dialect::GenericDialect;
pub use reader::{generic_template, GenericBackend};
pub(crate) use reader::{FOREIGN_KEY_COLUMN_MAP, KEY_COLUMN_MAP};
