//! Testing utilities and mock implementations.
//!
//! Lets the sync pipeline and the HTTP layer run against canned listing
//! pages instead of the real file index, and against a catalog that fails
//! on demand.
//!
//! # Example
//!
//! ```rust,ignore
//! use retrodrop_core::testing::{fixtures, MockListingFetcher};
//!
//! let fetcher = MockListingFetcher::new();
//! fetcher.set_page(
//!     "https://myrient.erista.me/files/No-Intro/Nintendo%20-%20Game%20Boy%20Advance/",
//!     &fixtures::listing_page(&["Golden Sun (USA)"]),
//! );
//! ```

mod mock_catalog;
mod mock_fetcher;

pub use mock_catalog::MockGameCatalog;
pub use mock_fetcher::MockListingFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::NewGameEntry;

    /// Percent-encode spaces the way the file index does in its links.
    pub fn encode_name(name: &str) -> String {
        name.replace(' ', "%20")
    }

    /// A directory listing page in the file index's table layout.
    ///
    /// Each title becomes a `<title>.zip` row with a relative link, preceded
    /// by a parent-directory row and a sort header that must be skipped.
    pub fn listing_page(titles: &[&str]) -> String {
        let rows: String = titles
            .iter()
            .map(|title| {
                format!(
                    r#"<tr><td class="link"><a href="{href}.zip" title="{title}.zip">{title}.zip</a></td><td class="size">4.0 MiB</td><td class="date">2024-01-01 00:00</td></tr>
"#,
                    href = encode_name(title),
                    title = title
                )
            })
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html>
<head><title>Index of /files/</title></head>
<body>
<table id="list">
<thead><tr><th><a href="?C=N&amp;O=A">File Name</a></th><th><a href="?C=S&amp;O=A">File Size</a></th></tr></thead>
<tbody>
<tr><td class="link"><a href="../" title="Parent directory">Parent directory/</a></td><td class="size">-</td><td class="date">-</td></tr>
{rows}</tbody>
</table>
</body>
</html>
"#
        )
    }

    /// A new catalog entry with a download URL derived from the title.
    pub fn game_entry(title: &str, system: &str) -> NewGameEntry {
        NewGameEntry::new(
            title,
            system,
            format!("https://files.example/{}/{}.zip", system, encode_name(title)),
        )
    }
}
