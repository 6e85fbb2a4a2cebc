//! Wiring of catalog, store and diagnostics into per-list resolvers.

use std::sync::Arc;

use tracing::info;

use crate::catalog::Catalog;
use crate::codes::{CodeBridge, DiagnosticSink, NullSink, Resolver, TracingSink};
use crate::error::{CatalogError, Result};
use crate::models::config::EtaxConfig;
use crate::models::record::CodeRecord;
use crate::store::{Dataset, MemoryStore, ReferenceStore};

/// Hands out resolvers and bridges that share one store and one sink.
///
/// Built once at start-up; read-only afterwards.
#[derive(Clone)]
pub struct CodeRegistry {
    catalog: Arc<Catalog>,
    store: Option<Arc<dyn ReferenceStore>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl CodeRegistry {
    /// Registry without a store, reporting through `tracing`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store: None,
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn ReferenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Build the catalog and the in-memory store described by `config`.
    pub fn from_config(config: &EtaxConfig) -> Result<Self> {
        let mut catalog = if config.catalog.include_builtin {
            Catalog::builtin()?
        } else {
            Catalog::new()
        };
        for path in &config.catalog.policy_files {
            catalog.merge(Catalog::from_file(path)?);
        }

        let mut registry = Self::new(catalog);

        if config.store.enabled {
            let mut dataset = if config.store.include_builtin_dataset {
                Dataset::builtin()?
            } else {
                Dataset::default()
            };
            for path in &config.store.datasets {
                dataset.merge(Dataset::from_file(path)?);
            }
            dataset.canonicalize(&registry.catalog);

            let store = MemoryStore::from_dataset(&dataset);
            info!("Reference store ready with {} records", store.len());
            registry = registry.with_store(Arc::new(store));
        } else {
            info!("Reference store disabled, codes resolve to placeholders");
        }

        if !config.diagnostics.emit_warnings {
            registry = registry.with_sink(Arc::new(NullSink));
        }

        Ok(registry)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Resolver for one list.
    pub fn resolver(&self, list: &str) -> std::result::Result<Resolver, CatalogError> {
        let policy = self.catalog.require(list)?;
        let resolver = Resolver::new(policy).with_sink(self.sink.clone());
        Ok(match &self.store {
            Some(store) => resolver.with_store(store.clone()),
            None => resolver,
        })
    }

    /// Bridge for one list.
    pub fn bridge(&self, list: &str) -> std::result::Result<CodeBridge, CatalogError> {
        CodeBridge::new(self.resolver(list)?)
    }

    /// Resolve a single raw code.
    pub fn resolve(
        &self,
        list: &str,
        raw: &str,
    ) -> std::result::Result<Option<CodeRecord>, CatalogError> {
        Ok(self.resolver(list)?.resolve(raw))
    }
}
