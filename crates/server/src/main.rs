use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retrodrop_core::{
    load_config, load_default_config, validate_config, CatalogQueryService, Config, GameCatalog,
    HttpListingFetcher, ListingFetcher, SqliteGameCatalog, SyncOrchestrator,
};
use retrodrop_server::api::create_router;
use retrodrop_server::state::AppState;

/// Config file used when RETRODROP_CONFIG is not set
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = resolve_config()?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!(
        "Listing source: {} ({} systems)",
        config.source.base_url,
        config.source.systems.len()
    );

    // Create SQLite game catalog
    let catalog: Arc<dyn GameCatalog> = Arc::new(
        SqliteGameCatalog::new(&config.database.path)
            .context("Failed to open game catalog")?,
    );
    info!("Game catalog opened");

    // Create listing fetcher
    let fetcher: Arc<dyn ListingFetcher> = Arc::new(
        HttpListingFetcher::new(&config.source).context("Failed to create listing fetcher")?,
    );

    let orchestrator = Arc::new(SyncOrchestrator::new(
        Arc::clone(&catalog),
        fetcher,
        config.source.clone(),
    ));
    let query = CatalogQueryService::new(catalog, &config.source);

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), query, orchestrator));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Load configuration.
///
/// An explicit RETRODROP_CONFIG path must exist. Without it, `config.toml`
/// is used when present, otherwise built-in defaults plus env overrides.
fn resolve_config() -> Result<Config> {
    match std::env::var("RETRODROP_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
            load_config(Path::new(DEFAULT_CONFIG_PATH))
                .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH))
        }
        Err(_) => {
            info!("No configuration file found, using defaults");
            load_default_config().context("Failed to load default config")
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
