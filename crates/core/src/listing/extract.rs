//! Archive entry extraction from directory-listing HTML.

use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{ScrapedEntry, ARCHIVE_SUFFIX};

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Parsed listing page.
pub struct ListingExtractor {
    document: Html,
    page_url: Option<Url>,
}

impl ListingExtractor {
    /// Parse a listing page. `page_url` is used to resolve relative links;
    /// if it does not parse, links are kept verbatim.
    pub fn from_html(html: &str, page_url: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            page_url: Url::parse(page_url).ok(),
        }
    }

    /// Archive entries in document order. Duplicates are kept.
    pub fn entries(&self) -> impl Iterator<Item = ScrapedEntry> + '_ {
        self.document
            .select(&ANCHOR_SELECTOR)
            .filter_map(move |anchor| self.anchor_entry(anchor))
    }

    fn anchor_entry(&self, anchor: ElementRef<'_>) -> Option<ScrapedEntry> {
        let element = anchor.value();
        let title = element.attr("title")?.strip_suffix(ARCHIVE_SUFFIX)?;
        if title.is_empty() {
            return None;
        }

        let href = element.attr("href")?;
        let download_url = self.resolve(href)?;

        debug!(title = %title, "Found title");

        Some(ScrapedEntry {
            title: title.to_string(),
            download_url,
        })
    }

    fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let resolved = match &self.page_url {
            Some(base) => base
                .join(href)
                .map(String::from)
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        };
        Some(resolved)
    }
}

/// Extract archive entries from a listing page.
pub fn extract_entries(html: &str, page_url: &str) -> Vec<ScrapedEntry> {
    ListingExtractor::from_html(html, page_url).entries().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://myrient.example/files/No-Intro/Nintendo%20-%20Game%20Boy%20Advance/";

    fn titles(entries: &[ScrapedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn test_extracts_zip_anchors_only() {
        let html = r#"
            <html><body>
              <a title="Super Game.zip" href="/f/1">Super Game.zip</a>
              <a title="Readme" href="/f/2">Readme</a>
              <a title="Other Game.zip" href="/f/3">Other Game.zip</a>
            </body></html>
        "#;
        let entries = extract_entries(html, "https://host.example/list/");
        assert_eq!(
            entries,
            vec![
                ScrapedEntry {
                    title: "Super Game".to_string(),
                    download_url: "https://host.example/f/1".to_string(),
                },
                ScrapedEntry {
                    title: "Other Game".to_string(),
                    download_url: "https://host.example/f/3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_resolves_relative_links_against_page() {
        let html = r#"<a title="Advance Wars (USA).zip" href="Advance%20Wars%20(USA).zip">x</a>"#;
        let entries = extract_entries(html, PAGE);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Advance Wars (USA)");
        assert_eq!(entries[0].download_url, format!("{}Advance%20Wars%20(USA).zip", PAGE));
    }

    #[test]
    fn test_keeps_absolute_links() {
        let html = r#"<a title="Game.zip" href="https://cdn.example/Game.zip">Game</a>"#;
        let entries = extract_entries(html, PAGE);
        assert_eq!(entries[0].download_url, "https://cdn.example/Game.zip");
    }

    #[test]
    fn test_unparsable_page_url_keeps_links_verbatim() {
        let html = r#"<a title="Game.zip" href="/f/9">Game</a>"#;
        let entries = extract_entries(html, "");
        assert_eq!(entries[0].download_url, "/f/9");
    }

    #[test]
    fn test_skips_missing_or_empty_title() {
        let html = r#"
            <a href="/f/1">No title.zip</a>
            <a title="" href="/f/2">Empty title</a>
            <a title=".zip" href="/f/3">Only suffix</a>
        "#;
        assert!(extract_entries(html, PAGE).is_empty());
    }

    #[test]
    fn test_skips_other_suffixes() {
        let html = r#"
            <a title="Game.7z" href="/f/1">a</a>
            <a title="Game.ZIP" href="/f/2">b</a>
            <a title="Game.zip.txt" href="/f/3">c</a>
            <a title="Parent directory/" href="../">d</a>
        "#;
        assert!(extract_entries(html, PAGE).is_empty());
    }

    #[test]
    fn test_skips_missing_or_empty_href() {
        let html = r#"
            <a title="No Link.zip">a</a>
            <a title="Empty Link.zip" href="">b</a>
            <a title="Blank Link.zip" href="   ">c</a>
        "#;
        assert!(extract_entries(html, PAGE).is_empty());
    }

    #[test]
    fn test_strips_only_one_suffix() {
        let html = r#"<a title="Weird.zip.zip" href="w">a</a>"#;
        let entries = extract_entries(html, PAGE);
        assert_eq!(titles(&entries), vec!["Weird.zip"]);
    }

    #[test]
    fn test_preserves_order_and_duplicates() {
        let html = r#"
            <a title="B.zip" href="b">b</a>
            <a title="A.zip" href="a">a</a>
            <a title="B.zip" href="b">b again</a>
        "#;
        let entries = extract_entries(html, PAGE);
        assert_eq!(titles(&entries), vec!["B", "A", "B"]);
        assert_eq!(entries[0], entries[2]);
    }

    #[test]
    fn test_nested_anchors_in_table_listing() {
        let html = r#"
            <table id="list">
              <thead><tr><th><a href="?C=N&O=A">File Name</a></th></tr></thead>
              <tbody>
                <tr><td class="link"><a href="../" title="Parent directory">Parent directory/</a></td></tr>
                <tr><td class="link"><a href="Metroid%20Fusion%20(USA).zip" title="Metroid Fusion (USA).zip">Metroid Fusion (USA).zip</a></td><td class="size">5.9 MiB</td></tr>
                <tr><td class="link"><a href="Golden%20Sun%20(USA).zip" title="Golden Sun (USA).zip">Golden Sun (USA).zip</a></td><td class="size">4.1 MiB</td></tr>
              </tbody>
            </table>
        "#;
        let entries = extract_entries(html, PAGE);
        assert_eq!(
            titles(&entries),
            vec!["Metroid Fusion (USA)", "Golden Sun (USA)"]
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_entries("", PAGE).is_empty());
    }

    #[test]
    fn test_entries_iterator_is_lazy_over_document() {
        let extractor = ListingExtractor::from_html(
            r#"<a title="One.zip" href="1">1</a><a title="Two.zip" href="2">2</a>"#,
            PAGE,
        );
        let mut iter = extractor.entries();
        assert_eq!(iter.next().unwrap().title, "One");
        assert_eq!(iter.next().unwrap().title, "Two");
        assert!(iter.next().is_none());
    }
}
