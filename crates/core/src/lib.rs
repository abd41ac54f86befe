pub mod catalog;
pub mod config;
pub mod listing;
pub mod metrics;
pub mod query;
pub mod sync;
pub mod testing;

pub use catalog::{CatalogError, GameCatalog, GameEntry, GameQuery, NewGameEntry, SqliteGameCatalog};
pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
    DatabaseConfig, SanitizedConfig, ServerConfig, SourceConfig,
};
pub use listing::{
    extract_entries, FetchError, HttpListingFetcher, ListingExtractor, ListingFetcher,
    ScrapedEntry,
};
pub use query::CatalogQueryService;
pub use sync::{
    SyncError, SyncOrchestrator, SyncOutcome, SyncPhase, SyncReport, SyncStatus, SyncStep,
    SystemSyncReport,
};
