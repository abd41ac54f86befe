//! HTTP listing fetcher.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::debug;

use crate::config::SourceConfig;

use super::FetchError;

/// Default User-Agent for listing requests.
const DEFAULT_USER_AGENT: &str = concat!("retro-drop/", env!("CARGO_PKG_VERSION"));

/// Fetches the raw HTML of a directory-listing page.
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Perform a single GET and return the body. No retries.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher.
pub struct HttpListingFetcher {
    client: Client,
}

impl HttpListingFetcher {
    /// Create a fetcher from the source configuration.
    pub fn new(config: &SourceConfig) -> Result<Self, FetchError> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs as u64));
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    FetchError::InvalidUrl(url.to_string())
                } else if e.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else if e.is_connect() {
                    FetchError::ConnectionFailed(e.to_string())
                } else {
                    FetchError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Visited listing");

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Request(format!("Failed to read body: {}", e)))
    }
}
