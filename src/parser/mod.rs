//! HTML parsing and content extraction
//!
//! This module turns fetched page bodies into parsed documents, pulls out the
//! page title and locates the main content region.

pub mod extract;
pub mod sanitize;
pub mod selectors;

pub use extract::{ContentExtractor, ContentRoot, ContentSource};

use scraper::Html;

use crate::parser::sanitize::clean_title;
use crate::parser::selectors::ContentSelectors;

/// Parse a full HTML document
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Page title from `<title>`, without the site-name suffix
///
/// Falls back to [`sanitize::UNTITLED`] when the page has no title.
pub fn extract_title(document: &Html) -> String {
    let selectors = ContentSelectors::new();
    let raw: String = document
        .select(selectors.title)
        .next()
        .map(|el| el.text().collect())
        .unwrap_or_default();

    clean_title(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title_strips_site_suffix() {
        let doc = parse_document(
            "<html><head><title>Y.Map | Yjs Docs</title></head><body></body></html>",
        );
        assert_eq!(extract_title(&doc), "Y.Map");
    }

    #[test]
    fn test_missing_title_is_untitled() {
        let doc = parse_document("<html><body><p>No title</p></body></html>");
        assert_eq!(extract_title(&doc), "Untitled");
    }
}
