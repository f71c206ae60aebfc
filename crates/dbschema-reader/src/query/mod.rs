//! Query templates and scope binding.
//!
//! - [`template`]: static per-backend SQL plus column maps
//! - [`binder`]: renders a template's scope predicate for a dialect

mod binder;
mod template;

pub use binder::{BoundQuery, ParameterBinder};
pub use template::{ColumnMap, QueryTemplate, Transform, RULE_WORDS, SCOPE_MARKER};
