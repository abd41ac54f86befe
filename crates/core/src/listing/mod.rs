//! Directory-listing scraping.
//!
//! A [`ListingFetcher`] downloads a listing page and [`extract_entries`]
//! turns its anchors into [`ScrapedEntry`] values. Extraction is a pure
//! function over the HTML so it can be tested against literal fixtures.

mod extract;
mod fetcher;
mod types;

pub use extract::{extract_entries, ListingExtractor};
pub use fetcher::{HttpListingFetcher, ListingFetcher};
pub use types::*;
