//! Read-only access to the catalog for the HTTP layer.

use std::sync::Arc;

use crate::catalog::{CatalogError, GameCatalog, GameEntry, GameQuery};
use crate::config::SourceConfig;

/// Catalog reads plus the configured systems list.
#[derive(Clone)]
pub struct CatalogQueryService {
    catalog: Arc<dyn GameCatalog>,
    systems: Vec<String>,
}

impl CatalogQueryService {
    pub fn new(catalog: Arc<dyn GameCatalog>, source: &SourceConfig) -> Self {
        Self {
            catalog,
            systems: source.system_keys(),
        }
    }

    /// Configured system keys. Not a store read.
    pub fn systems(&self) -> &[String] {
        &self.systems
    }

    /// Entries matching the query. Runs on the blocking pool.
    pub async fn games(&self, query: GameQuery) -> Result<Vec<GameEntry>, CatalogError> {
        let catalog = Arc::clone(&self.catalog);
        tokio::task::spawn_blocking(move || catalog.query(&query))
            .await
            .map_err(|e| CatalogError::Internal(format!("catalog task failed: {}", e)))?
    }

    /// Number of stored entries; `NotPopulated` before the first sync.
    pub async fn total_entries(&self) -> Result<u64, CatalogError> {
        let catalog = Arc::clone(&self.catalog);
        tokio::task::spawn_blocking(move || catalog.count(None))
            .await
            .map_err(|e| CatalogError::Internal(format!("catalog task failed: {}", e)))?
    }
}
