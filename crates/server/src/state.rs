use std::sync::Arc;
use retrodrop_core::{CatalogQueryService, Config, SanitizedConfig, SyncOrchestrator};

/// Shared application state
pub struct AppState {
    config: Config,
    query: CatalogQueryService,
    orchestrator: Arc<SyncOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        query: CatalogQueryService,
        orchestrator: Arc<SyncOrchestrator>,
    ) -> Self {
        Self {
            config,
            query,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn query(&self) -> &CatalogQueryService {
        &self.query
    }

    pub fn orchestrator(&self) -> &SyncOrchestrator {
        self.orchestrator.as_ref()
    }
}
