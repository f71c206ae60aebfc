//! Category dispatch: scope check, route, bind, execute, normalize.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::assemble;
use crate::config::Config;
use crate::core::{
    BackendCatalog, BackendReader, CanonicalRowSet, CatalogConnection, CategorySupport,
    ConstraintDescriptor, ConstraintNaming, ForeignKeyDescriptor, IdentityColumnDescriptor,
    IndexDescriptor, MetadataCategory, ScopeFilter, ScopePolicy, SequenceDescriptor,
};
use crate::drivers::generic::generic_template;
use crate::error::{ReaderError, Result};
use crate::normalize::normalize;
use crate::query::{BoundQuery, ParameterBinder, QueryTemplate};

/// Where a category read is answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// The backend's own catalog query.
    Native,
    /// The generic INFORMATION_SCHEMA query.
    Generic,
    /// No query; the read returns an empty set.
    Unsupported,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Route::Native => "native",
            Route::Generic => "generic",
            Route::Unsupported => "unsupported",
        })
    }
}

/// A category read ready to run.
#[derive(Debug, Clone)]
pub struct ReadPlan {
    pub route: Route,
    pub template: &'static QueryTemplate,
    pub query: BoundQuery,
}

/// Reads metadata categories for one engine.
///
/// Holds no connection and no results; every call is independent, so a
/// reader can be shared across tasks that each bring their own connection.
#[derive(Clone)]
pub struct SchemaReader {
    backend: Arc<dyn BackendReader>,
    scope_policy: ScopePolicy,
}

impl SchemaReader {
    /// Create a reader for a backend, using the backend's scope rules.
    pub fn new(backend: Arc<dyn BackendReader>) -> Self {
        let scope_policy = backend.scope_policy();
        Self {
            backend,
            scope_policy,
        }
    }

    /// Resolve an engine identifier through a catalog.
    pub fn for_engine(catalog: &BackendCatalog, engine_id: &str) -> Result<Self> {
        Ok(Self::new(catalog.resolve(engine_id)?))
    }

    /// Create a reader from configuration, using the built-in backends.
    pub fn from_config(config: &Config) -> Result<Self> {
        let reader = Self::for_engine(&BackendCatalog::with_builtins(), &config.engine)?;
        Ok(match config.scope_policy {
            Some(policy) => reader.with_scope_policy(policy),
            None => reader,
        })
    }

    /// Override the backend's scope rules.
    pub fn with_scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.scope_policy = policy;
        self
    }

    pub fn engine(&self) -> &str {
        self.backend.engine()
    }

    pub fn backend(&self) -> &dyn BackendReader {
        self.backend.as_ref()
    }

    pub fn scope_policy(&self) -> ScopePolicy {
        self.scope_policy
    }

    pub fn constraint_naming(&self) -> ConstraintNaming {
        self.backend.constraint_naming()
    }

    fn resolve(&self, category: MetadataCategory) -> Option<(Route, &'static QueryTemplate)> {
        match self.backend.support(category) {
            CategorySupport::Native(template) => Some((Route::Native, template)),
            CategorySupport::Generic => generic_template(category).map(|t| (Route::Generic, t)),
            CategorySupport::Unsupported => None,
        }
    }

    /// Route a category takes on this engine.
    ///
    /// A generic fallback with no generic query is reported as unsupported.
    pub fn route(&self, category: MetadataCategory) -> Route {
        self.resolve(category)
            .map_or(Route::Unsupported, |(route, _)| route)
    }

    /// Check the scope and bind the category's query.
    ///
    /// Returns `None` when the category is unsupported on this engine.
    pub fn plan(&self, category: MetadataCategory, scope: &ScopeFilter) -> Result<Option<ReadPlan>> {
        self.scope_policy
            .check(scope)
            .map_err(|message| ReaderError::Scope {
                category,
                scope: scope.clone(),
                message,
            })?;

        Ok(self.resolve(category).map(|(route, template)| ReadPlan {
            route,
            template,
            query: ParameterBinder::new(self.backend.dialect()).bind(template, scope),
        }))
    }

    /// Read one category for a scope over a caller-owned connection.
    ///
    /// Returns the complete canonical row set or an error, never a partial
    /// set. An empty result is not an error.
    pub async fn read(
        &self,
        conn: &dyn CatalogConnection,
        category: MetadataCategory,
        scope: &ScopeFilter,
    ) -> Result<CanonicalRowSet> {
        debug!("Dispatching {} on {} for scope {}", category, self.engine(), scope);

        let Some(plan) = self.plan(category, scope)? else {
            debug!("{} is not supported on {}", category, self.engine());
            return Ok(CanonicalRowSet::empty(category));
        };
        debug!("{} route: {}", category, plan.route);

        let raw = conn
            .fetch(&plan.query)
            .await
            .map_err(|source| ReaderError::QueryExecution {
                category,
                scope: scope.clone(),
                source,
            })?;
        debug!("{} returned {} raw rows", category, raw.len());

        let rows = normalize(category, plan.template.columns, raw)?;
        info!(
            "Read {} {} rows from {} {}",
            rows.len(),
            category,
            self.engine(),
            scope
        );
        Ok(rows)
    }

    /// [`read`](Self::read) that gives up when `token` is cancelled.
    pub async fn read_cancellable(
        &self,
        conn: &dyn CatalogConnection,
        category: MetadataCategory,
        scope: &ScopeFilter,
        token: &CancellationToken,
    ) -> Result<CanonicalRowSet> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("{} read cancelled", category);
                Err(ReaderError::Cancelled)
            }
            result = self.read(conn, category, scope) => result,
        }
    }

    pub async fn primary_keys(
        &self,
        conn: &dyn CatalogConnection,
        scope: &ScopeFilter,
    ) -> Result<Vec<ConstraintDescriptor>> {
        let rows = self.read(conn, MetadataCategory::PrimaryKeys, scope).await?;
        assemble::assemble_primary_keys(rows, self.constraint_naming())
    }

    pub async fn unique_keys(
        &self,
        conn: &dyn CatalogConnection,
        scope: &ScopeFilter,
    ) -> Result<Vec<ConstraintDescriptor>> {
        let rows = self.read(conn, MetadataCategory::UniqueKeys, scope).await?;
        assemble::assemble_unique_keys(rows, self.constraint_naming())
    }

    pub async fn foreign_keys(
        &self,
        conn: &dyn CatalogConnection,
        scope: &ScopeFilter,
    ) -> Result<Vec<ForeignKeyDescriptor>> {
        let rows = self.read(conn, MetadataCategory::ForeignKeys, scope).await?;
        assemble::assemble_foreign_keys(rows, self.constraint_naming())
    }

    pub async fn sequences(
        &self,
        conn: &dyn CatalogConnection,
        scope: &ScopeFilter,
    ) -> Result<Vec<SequenceDescriptor>> {
        let rows = self.read(conn, MetadataCategory::Sequences, scope).await?;
        assemble::assemble_sequences(rows)
    }

    pub async fn identity_columns(
        &self,
        conn: &dyn CatalogConnection,
        scope: &ScopeFilter,
    ) -> Result<Vec<IdentityColumnDescriptor>> {
        let rows = self
            .read(conn, MetadataCategory::IdentityColumns, scope)
            .await?;
        assemble::assemble_identity_columns(rows)
    }

    /// Indexes with their columns; two catalog reads.
    pub async fn indexes(
        &self,
        conn: &dyn CatalogConnection,
        scope: &ScopeFilter,
    ) -> Result<Vec<IndexDescriptor>> {
        let indexes = self.read(conn, MetadataCategory::Indexes, scope).await?;
        let columns = self.read(conn, MetadataCategory::IndexColumns, scope).await?;
        assemble::assemble_indexes(indexes, columns)
    }
}

impl fmt::Debug for SchemaReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaReader")
            .field("engine", &self.engine())
            .field("scope_policy", &self.scope_policy)
            .finish()
    }
}
