//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock listing fetcher injected, so sync runs against canned pages.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use retrodrop_core::{
    testing::{MockGameCatalog, MockListingFetcher},
    CatalogQueryService, Config, DatabaseConfig, GameCatalog,
    ListingFetcher, ServerConfig, SourceConfig, SqliteGameCatalog, SyncOrchestrator,
};

/// Re-export fixtures for test convenience
pub use retrodrop_core::testing::fixtures;

/// Base URL of the fake file index.
pub const BASE_URL: &str = "http://files.test";

/// Test fixture for E2E testing with a mock fetcher.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_init() {
///     let fixture = TestFixture::new();
///     fixture.set_listing("gba", &["Golden Sun"]);
///
///     let response = fixture.post("/init").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock fetcher - configure listing pages and failures
    pub fetcher: Arc<MockListingFetcher>,
    /// Source configuration used by the orchestrator
    pub source: SourceConfig,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with `gba` and `snes` systems.
    pub fn new() -> Self {
        Self::with_systems(&["gba", "snes"])
    }

    /// Fixture with the given systems; each maps to `/<system>/`.
    pub fn with_systems(systems: &[&str]) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let catalog: Arc<dyn GameCatalog> =
            Arc::new(SqliteGameCatalog::new(&db_path).expect("Failed to create catalog"));
        Self::build(systems, catalog, temp_dir)
    }

    /// Fixture backed by a catalog that can be told to fail.
    pub fn with_mock_catalog(systems: &[&str]) -> (Self, Arc<MockGameCatalog>) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = Arc::new(MockGameCatalog::new());
        let fixture = Self::build(
            systems,
            Arc::clone(&catalog) as Arc<dyn GameCatalog>,
            temp_dir,
        );
        (fixture, catalog)
    }

    fn build(systems: &[&str], catalog: Arc<dyn GameCatalog>, temp_dir: TempDir) -> Self {
        let db_path = temp_dir.path().join("test.db");

        let source = SourceConfig {
            base_url: BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: None,
            systems: systems
                .iter()
                .map(|s| (s.to_string(), format!("/{}/", s)))
                .collect::<BTreeMap<_, _>>(),
        };

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            source: source.clone(),
        };

        let fetcher = Arc::new(MockListingFetcher::new());

        let orchestrator = Arc::new(SyncOrchestrator::new(
            Arc::clone(&catalog),
            Arc::clone(&fetcher) as Arc<dyn ListingFetcher>,
            source.clone(),
        ));
        let query = CatalogQueryService::new(catalog, &source);

        let state = Arc::new(retrodrop_server::state::AppState::new(
            config,
            query,
            orchestrator,
        ));
        let router = retrodrop_server::api::create_router(state);

        Self {
            router,
            fetcher,
            source,
            temp_dir,
        }
    }

    /// Listing URL the orchestrator will fetch for `system`.
    pub fn listing_url(&self, system: &str) -> String {
        self.source
            .listing_url(system)
            .expect("system not configured in fixture")
    }

    /// Serve a listing page with the given titles for `system`.
    pub fn set_listing(&self, system: &str, titles: &[&str]) {
        self.fetcher
            .set_page(&self.listing_url(system), &fixtures::listing_page(titles));
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path).await
    }

    /// Send a POST request with no body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Start a request and abandon it after `after`, like a client hanging up.
    pub async fn post_and_disconnect(&self, path: &str, after: std::time::Duration) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let result = tokio::time::timeout(after, self.router.clone().oneshot(request)).await;
        assert!(result.is_err(), "request finished before the disconnect");
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
