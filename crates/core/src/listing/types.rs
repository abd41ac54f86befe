//! Types for directory-listing scraping.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::NewGameEntry;

/// Archive suffix an anchor title must carry to be listed.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// An archive link found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedEntry {
    /// Title with the archive suffix removed.
    pub title: String,
    /// Link target, absolute when it could be resolved against the page URL.
    pub download_url: String,
}

impl ScrapedEntry {
    /// Tag this entry with the system it was scraped for.
    pub fn into_new_entry(self, system: &str) -> NewGameEntry {
        NewGameEntry {
            title: self.title,
            system: system.to_string(),
            download_url: self.download_url,
        }
    }
}

/// Errors from fetching a listing page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
