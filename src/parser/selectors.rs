//! CSS selectors for locating documentation content
//!
//! Content selectors are tried in order and the first match wins; noise
//! selectors describe boilerplate stripped from the `<body>` fallback.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors; all inputs are literals
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Content region candidates in priority order
pub const CONTENT_SELECTORS: &[&str] = &[
    "main", ".main", "#main", ".content", "#content", "article", ".article",
];

/// Tags removed wholesale from the body fallback
pub const NOISE_TAGS: &[&str] = &["nav", "footer", "script", "style"];

/// Navigation-like classes and ids removed from the body fallback
pub const NOISE_SELECTORS: &[&str] = &[
    ".navigation",
    ".nav",
    ".navbar",
    ".sidebar",
    ".footer",
    ".header",
    ".menu",
    ".breadcrumb",
    "#navigation",
    "#nav",
    "#navbar",
    "#sidebar",
    "#footer",
    "#header",
    "#menu",
    "#breadcrumb",
];

lazy_static! {
    static ref CONTENT: Vec<(&'static str, Selector)> = CONTENT_SELECTORS
        .iter()
        .map(|s| (*s, Selector::parse(s).expect("Invalid CSS selector")))
        .collect();

    static ref NOISE: Vec<Selector> = NOISE_TAGS
        .iter()
        .chain(NOISE_SELECTORS.iter())
        .map(|s| Selector::parse(s).expect("Invalid CSS selector"))
        .collect();

    static ref BODY: Selector = parse_selector!("body");
    static ref TITLE: Selector = parse_selector!("title");
}

/// Selector bundle used by the content extractor
pub struct ContentSelectors {
    /// `(source, selector)` pairs in priority order
    pub content: &'static [(&'static str, Selector)],
    /// Boilerplate selectors, tag names first
    pub noise: &'static [Selector],
    /// `<body>`
    pub body: &'static Selector,
    /// `<title>`
    pub title: &'static Selector,
}

impl ContentSelectors {
    pub fn new() -> Self {
        Self {
            content: CONTENT.as_slice(),
            noise: NOISE.as_slice(),
            body: &BODY,
            title: &TITLE,
        }
    }
}

impl Default for ContentSelectors {
    fn default() -> Self {
        Self::new()
    }
}
