//! URL scoping for documentation crawls
//!
//! Decides which discovered links belong to the documentation site and
//! harvests in-scope links from parsed pages.

use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

lazy_static! {
    static ref LINK_SELECTOR: Selector =
        Selector::parse("a[href]").expect("Invalid CSS selector: a[href]");
}

/// Same-host link filter
///
/// A link is accepted when, resolved against the page it was found on, it
/// points at the configured host and port exactly, carries neither a query
/// string nor a fragment, and does not end in a denylisted extension.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    /// Lowercased documentation host
    host: String,
    /// Explicit non-default port of the site, `None` for the scheme default
    port: Option<u16>,
    /// Lowercased extensions, each with its leading dot
    denied_extensions: Vec<String>,
}

impl UrlFilter {
    /// Create a filter for `host` with the given extension denylist
    ///
    /// # Examples
    ///
    /// ```
    /// use docharvest::crawler::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new("docs.example.dev", vec![".pdf".to_string()]);
    /// assert!(filter.accepts("/guide", "https://docs.example.dev/"));
    /// assert!(!filter.accepts("/guide.pdf", "https://docs.example.dev/"));
    /// assert!(!filter.accepts("https://example.dev/", "https://docs.example.dev/"));
    /// ```
    pub fn new(host: impl Into<String>, denied_extensions: Vec<String>) -> Self {
        Self {
            host: host.into().to_ascii_lowercase(),
            port: None,
            denied_extensions: denied_extensions
                .into_iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Admit only links on `port`; `None` means the scheme's default port
    ///
    /// # Examples
    ///
    /// ```
    /// use docharvest::crawler::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new("docs.example.dev", Vec::new()).with_port(Some(8443));
    /// assert!(filter.accepts("/guide", "https://docs.example.dev:8443/"));
    /// assert!(!filter.accepts("https://docs.example.dev/guide", "https://docs.example.dev:8443/"));
    /// ```
    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Host this filter admits
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolve `candidate` relative to `base`
    ///
    /// Returns `None` when either side cannot be parsed.
    pub fn resolve(&self, candidate: &str, base: &str) -> Option<Url> {
        let base = Url::parse(base).ok()?;
        base.join(candidate).ok()
    }

    /// Decide whether `candidate`, found on `base`, should be crawled
    pub fn accepts(&self, candidate: &str, base: &str) -> bool {
        if validators::has_query_or_fragment_marker(candidate) {
            return false;
        }

        match self.resolve(candidate, base) {
            Some(url) => self.accepts_url(&url),
            None => false,
        }
    }

    /// Apply the host, scheme, marker and extension rules to a resolved URL
    pub fn accepts_url(&self, url: &Url) -> bool {
        if !validators::is_http_scheme(url) {
            return false;
        }

        match url.host_str() {
            Some(host) if host.eq_ignore_ascii_case(&self.host) => {}
            _ => return false,
        }

        if url.port() != self.port {
            return false;
        }

        if url.query().is_some() || url.fragment().is_some() {
            return false;
        }

        !validators::has_denied_extension(url.path(), &self.denied_extensions)
    }

    /// Canonical form of `candidate` if it is accepted
    pub fn accept(&self, candidate: &str, base: &str) -> Option<String> {
        if validators::has_query_or_fragment_marker(candidate) {
            return None;
        }

        self.resolve(candidate, base)
            .filter(|url| self.accepts_url(url))
            .map(|url| url.to_string())
    }

    /// Harvest in-scope links from a full parsed page
    ///
    /// Links are returned in document order with duplicates removed; the
    /// first occurrence wins.
    pub fn extract_links(&self, document: &Html, page_url: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in document.select(&LINK_SELECTOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            match self.accept(href, page_url) {
                Some(url) => {
                    if seen.insert(url.clone()) {
                        links.push(url);
                    }
                }
                None => tracing::trace!(href = %href, page = %page_url, "Rejected link"),
            }
        }

        tracing::debug!(page = %page_url, count = links.len(), "Harvested links");
        links
    }
}

/// URL validation helpers
pub mod validators {
    use url::Url;

    /// Only plain web pages are crawled
    pub fn is_http_scheme(url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
    }

    /// Raw link text carries a fragment or query marker
    ///
    /// # Examples
    ///
    /// ```
    /// use docharvest::crawler::url::validators;
    ///
    /// assert!(validators::has_query_or_fragment_marker("/api#methods"));
    /// assert!(validators::has_query_or_fragment_marker("/search?q=map"));
    /// assert!(!validators::has_query_or_fragment_marker("/api/y.map"));
    /// ```
    pub fn has_query_or_fragment_marker(url: &str) -> bool {
        url.contains('#') || url.contains('?')
    }

    /// Path ends with one of the (lowercased) denied extensions
    pub fn has_denied_extension(path: &str, denied: &[String]) -> bool {
        let path = path.to_ascii_lowercase();
        denied.iter().any(|ext| path.ends_with(ext.as_str()))
    }
}
