//! Mock listing fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::listing::{FetchError, ListingFetcher};

/// Mock implementation of the ListingFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Serve canned HTML per URL
/// - Fail specific URLs
/// - Record fetched URLs for assertions
/// - Simulate slow responses
///
/// URLs with neither a page nor an error configured fail with HTTP 404.
///
/// # Example
///
/// ```rust,ignore
/// use retrodrop_core::testing::{fixtures, MockListingFetcher};
///
/// let fetcher = MockListingFetcher::new();
/// fetcher.set_page("http://host/gba/", &fixtures::listing_page(&["Golden Sun"]));
///
/// let html = fetcher.fetch("http://host/gba/").await?;
/// assert_eq!(fetcher.fetched_urls(), vec!["http://host/gba/"]);
/// ```
#[derive(Debug, Default)]
pub struct MockListingFetcher {
    pages: Arc<Mutex<HashMap<String, Result<String, FetchError>>>>,
    fetched: Arc<Mutex<Vec<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockListingFetcher {
    /// Create a new mock fetcher with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn set_page(&self, url: &str, html: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(html.to_string()));
    }

    /// Fail every fetch of `url` with `error`.
    pub fn set_error(&self, url: &str, error: FetchError) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(error));
    }

    /// Delay every fetch by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// URLs fetched so far, in order.
    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Forget recorded fetches.
    pub fn clear_fetched(&self) {
        self.fetched.lock().unwrap().clear();
    }
}

#[async_trait]
impl ListingFetcher for MockListingFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let page = self.pages.lock().unwrap().get(url).cloned();
        page.unwrap_or_else(|| {
            Err(FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        })
    }
}
