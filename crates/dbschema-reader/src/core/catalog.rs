//! Backend catalog for explicit dependency injection.
//!
//! The [`BackendCatalog`] maps engine identifiers to backend readers. It is
//! explicitly constructed and handed to whoever builds a
//! [`SchemaReader`](crate::SchemaReader); there is no global registry.
//!
//! Engine identifiers are matched case-insensitively and may carry a
//! version suffix (`postgres@16`, `db2-iseries 7.4`) which is ignored for
//! selection.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::drivers::{BackendImpl, BUILTIN_ENGINES};
use crate::error::{ReaderError, Result};

use super::traits::BackendReader;

/// Lowercased engine name with any version suffix removed.
///
/// ```
/// use dbschema_reader::core::engine_key;
///
/// assert_eq!(engine_key("PostgreSQL@16"), "postgresql");
/// assert_eq!(engine_key(" db2-iseries 7.4 "), "db2-iseries");
/// ```
pub fn engine_key(engine_id: &str) -> String {
    engine_id
        .trim()
        .split(|c: char| c == '@' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Registry of backend readers keyed by engine name.
#[derive(Default)]
pub struct BackendCatalog {
    /// Registered backends by canonical engine name.
    backends: BTreeMap<String, Arc<dyn BackendReader>>,

    /// Alternative spellings mapped to canonical engine names.
    aliases: HashMap<String, String>,
}

impl BackendCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with every built-in backend and its aliases.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        for (name, aliases) in BUILTIN_ENGINES {
            if let Some(backend) = BackendImpl::builtin(name) {
                catalog.register(*name, backend);
                for alias in *aliases {
                    catalog.register_alias(*alias, *name);
                }
            }
        }
        catalog
    }

    /// Register a backend under its canonical engine name.
    pub fn register(&mut self, name: impl Into<String>, backend: impl BackendReader + 'static) {
        self.backends
            .insert(name.into().to_lowercase(), Arc::new(backend));
    }

    /// Register a backend as an Arc (for sharing).
    pub fn register_arc(&mut self, name: impl Into<String>, backend: Arc<dyn BackendReader>) {
        self.backends.insert(name.into().to_lowercase(), backend);
    }

    /// Register an alternative spelling for an engine name.
    pub fn register_alias(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        self.aliases
            .insert(alias.into().to_lowercase(), name.into().to_lowercase());
    }

    /// Look up a backend by engine identifier.
    pub fn get(&self, engine_id: &str) -> Option<Arc<dyn BackendReader>> {
        let key = engine_key(engine_id);
        let name = self.aliases.get(&key).unwrap_or(&key);
        self.backends.get(name).cloned()
    }

    /// Look up a backend, returning a configuration error if none matches.
    pub fn resolve(&self, engine_id: &str) -> Result<Arc<dyn BackendReader>> {
        self.get(engine_id).ok_or_else(|| {
            ReaderError::Config(format!(
                "Unknown database engine: '{}'. Supported engines: {}",
                engine_id,
                self.engine_names().join(", ")
            ))
        })
    }

    /// Check if an engine identifier resolves to a backend.
    pub fn has_engine(&self, engine_id: &str) -> bool {
        self.get(engine_id).is_some()
    }

    /// Canonical names of all registered engines, sorted.
    pub fn engine_names(&self) -> Vec<&str> {
        self.backends.keys().map(String::as_str).collect()
    }

    /// Aliases registered for one canonical engine name, sorted.
    pub fn aliases_of(&self, name: &str) -> Vec<&str> {
        let name = name.to_lowercase();
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| **target == name)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }
}

impl std::fmt::Debug for BackendCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendCatalog")
            .field("backends", &self.engine_names())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}
