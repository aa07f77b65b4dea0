//! Main-content extraction
//!
//! Locates the primary content region of a documentation page. Selector
//! matches are taken as-is; the `<body>` fallback strips boilerplate from a
//! cloned working copy so the caller's document stays intact for link
//! harvesting.

use scraper::{ElementRef, Html};

use crate::parser::selectors::ContentSelectors;

/// Where a content root came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    /// First matching content selector
    Selector(&'static str),
    /// Whole body with boilerplate removed
    BodyFallback,
}

/// Extracted content region, detached from the page it came from
pub struct ContentRoot {
    fragment: Html,
    source: ContentSource,
}

impl ContentRoot {
    /// Build a content root from an HTML fragment
    pub fn from_html(html: &str, source: ContentSource) -> Self {
        Self {
            fragment: Html::parse_fragment(html),
            source,
        }
    }

    /// Parsed fragment holding the extracted nodes
    pub fn document(&self) -> &Html {
        &self.fragment
    }

    /// Root element wrapping the extracted nodes
    pub fn element(&self) -> ElementRef<'_> {
        self.fragment.root_element()
    }

    /// Extraction path that produced this root
    pub fn source(&self) -> ContentSource {
        self.source
    }

    /// Serialized HTML of the extracted region
    pub fn html(&self) -> String {
        self.element().inner_html()
    }

    /// Visible text, whitespace untouched
    pub fn text(&self) -> String {
        self.element().text().collect()
    }
}

impl std::fmt::Debug for ContentRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentRoot")
            .field("source", &self.source)
            .field("html", &self.html())
            .finish()
    }
}

/// Prioritized-selector content extractor
pub struct ContentExtractor {
    selectors: ContentSelectors,
}

impl ContentExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: ContentSelectors::new(),
        }
    }

    /// Find the primary content region of `document`
    ///
    /// Returns `None` only when the document has no `<body>`.
    pub fn extract(&self, document: &Html) -> Option<ContentRoot> {
        for (name, selector) in self.selectors.content {
            if let Some(element) = document.select(selector).next() {
                tracing::trace!(selector = %name, "Content selector matched");
                return Some(ContentRoot::from_html(
                    &element.html(),
                    ContentSource::Selector(*name),
                ));
            }
        }

        self.body_fallback(document)
    }

    /// Body minus navigation, scripts and other boilerplate
    fn body_fallback(&self, document: &Html) -> Option<ContentRoot> {
        document.select(self.selectors.body).next()?;

        let mut working = document.clone();
        let removed = strip_noise(&mut working, &self.selectors);
        tracing::trace!(removed, "Body fallback stripped boilerplate");

        let body = working.select(self.selectors.body).next()?;
        Some(ContentRoot::from_html(
            &body.inner_html(),
            ContentSource::BodyFallback,
        ))
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Detach every boilerplate element from `working`; returns how many went
fn strip_noise(working: &mut Html, selectors: &ContentSelectors) -> usize {
    let ids: Vec<_> = selectors
        .noise
        .iter()
        .flat_map(|selector| working.select(selector).map(|el| el.id()))
        .collect();

    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = working.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}
