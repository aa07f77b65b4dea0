//! Markdown rendering for extracted documentation content
//!
//! [`MarkdownConverter::render`] runs a content root through `html2md` and
//! returns a normalized Markdown body; [`finalize`] adds the page title as a
//! top-level heading when the body does not already open with one.
//!
//! Code blocks bypass the converter (see [`fences`]) and the converter's
//! output is rewritten to ATX headings and `-` bullets.

pub mod fences;

use regex::Regex;
use std::panic;
use std::sync::LazyLock;

use crate::config::ConverterConfig;
use crate::parser::sanitize::collapse_newlines;
use crate::parser::ContentRoot;
use crate::utils::error::ParseError;

/// Lines that open a block and so cannot carry a setext underline
static BLOCK_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+] |>|\||#|\d+[.)] )").unwrap());

static STAR_RULE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}(?:\*[ \t]*){3,}$").unwrap());

static ATX_CLOSER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6} .*?)[ \t]+#+[ \t]*$").unwrap());

static BULLET_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\s*)[*+] ").unwrap());

/// Rendering knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Language tag for fenced code blocks without a `language-*` class
    pub code_language: String,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            code_language: "javascript".to_string(),
        }
    }
}

impl From<&ConverterConfig> for ConversionOptions {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            code_language: config.code_language.clone(),
        }
    }
}

/// HTML to Markdown converter
#[derive(Debug, Clone, Default)]
pub struct MarkdownConverter {
    options: ConversionOptions,
}

impl MarkdownConverter {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Markdown body for `root`, blank lines collapsed and trimmed
    ///
    /// An empty string means the region had no renderable content.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Conversion` if the converter panics on this page.
    pub fn render(&self, root: &ContentRoot) -> Result<String, ParseError> {
        let prepared = fences::prepare(root.document(), &self.options.code_language);

        let converted = panic::catch_unwind(|| html2md::parse_html(&prepared.html))
            .map_err(|payload| ParseError::Conversion(panic_message(&*payload)))?;

        let markdown = fences::restore(&rewrite_markdown(&converted), &prepared.blocks);
        Ok(normalize(&markdown))
    }

    /// Full page text: rendered body with the title heading applied
    pub fn convert(&self, root: &ContentRoot, title: &str) -> Result<String, ParseError> {
        Ok(finalize(&self.render(root)?, title))
    }
}

/// Collapse runs of blank lines and trim the ends
pub fn normalize(text: &str) -> String {
    collapse_newlines(text).trim().to_string()
}

/// Prepend `# {title}` unless the body already starts with a heading
///
/// # Examples
///
/// ```
/// use docharvest::markdown::finalize;
///
/// assert_eq!(finalize("Body text", "Intro"), "# Intro\n\nBody text");
/// assert_eq!(finalize("## Setup\n\nSteps", "Intro"), "## Setup\n\nSteps");
/// ```
pub fn finalize(body: &str, title: &str) -> String {
    let body = normalize(body);
    if body.starts_with('#') {
        body
    } else {
        format!("# {title}\n\n{body}")
    }
}

/// Setext headings to ATX, `*`/`+` bullets to `-`, `* * *` rules to `---`
///
/// # Examples
///
/// ```
/// use docharvest::markdown::rewrite_markdown;
///
/// assert_eq!(rewrite_markdown("Title\n=====\n\n* a\n* b"), "# Title\n\n- a\n- b");
/// ```
pub fn rewrite_markdown(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut out = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if let Some(level) = lines.get(i + 1).and_then(|next| setext_level(line, next)) {
            out.push(format!("{} {}", "#".repeat(level), line.trim()));
            i += 2;
            continue;
        }
        out.push(rewrite_line(line));
        i += 1;
    }

    out.join("\n")
}

fn setext_level(line: &str, underline: &str) -> Option<usize> {
    if line.trim().is_empty() || BLOCK_START_REGEX.is_match(line) {
        return None;
    }
    let underline = underline.trim();
    if underline.is_empty() {
        None
    } else if underline.chars().all(|c| c == '=') {
        Some(1)
    } else if underline.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn rewrite_line(line: &str) -> String {
    if STAR_RULE_REGEX.is_match(line) {
        return "---".to_string();
    }
    if let Some(caps) = ATX_CLOSER_REGEX.captures(line) {
        return caps[1].to_string();
    }
    BULLET_REGEX.replace(line, "${1}- ").into_owned()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "converter panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ContentSource;

    fn root(html: &str) -> ContentRoot {
        ContentRoot::from_html(html, ContentSource::Selector("main"))
    }

    fn render(html: &str) -> String {
        MarkdownConverter::default().render(&root(html)).unwrap()
    }

    #[test]
    fn test_render_collapses_and_trims() {
        let md = render("<main>\n\n<p>One</p>\n\n\n\n<p>Two</p>\n</main>");
        assert_eq!(md, "One\n\nTwo");
    }

    #[test]
    fn test_convert_prepends_title() {
        let converter = MarkdownConverter::default();
        let md = converter.convert(&root("<main><p>Hello</p></main>"), "Intro").unwrap();
        assert_eq!(md, "# Intro\n\nHello");
    }

    #[test]
    fn test_convert_keeps_existing_heading() {
        let converter = MarkdownConverter::default();
        let md = converter
            .convert(&root("<main><h1>Getting Started</h1><p>x</p></main>"), "Intro")
            .unwrap();
        assert_eq!(md, "# Getting Started\n\nx");
    }

    #[test]
    fn test_render_empty_region() {
        assert_eq!(render("<main>  <script>x()</script> </main>"), "");
    }

    #[test]
    fn test_custom_code_language() {
        let converter = MarkdownConverter::new(ConversionOptions {
            code_language: "typescript".into(),
        });
        let md = converter
            .render(&root("<pre><code>let a: number = 1</code></pre>"))
            .unwrap();
        assert_eq!(md, "```typescript\nlet a: number = 1\n```");
    }

    #[test]
    fn test_code_indentation_kept() {
        let md = render("<main><p>See</p><pre><code>def f():\n    x = 1\n    \n    return x</code></pre></main>");
        assert!(md.ends_with("```javascript\ndef f():\n    x = 1\n    \n    return x\n```"), "{md}");
    }

    #[test]
    fn test_headings_are_atx() {
        let md = render("<main><h1>Top</h1><p>a</p><h2>Sub</h2><p>b</p><h3>Deep</h3><p>c</p></main>");
        let headings: Vec<&str> = md.lines().filter(|l| l.starts_with('#')).collect();
        assert_eq!(headings, vec!["# Top", "## Sub", "### Deep"]);
        assert!(!md.contains("==="));
    }

    #[test]
    fn test_bullets_are_dashes() {
        let md = render("<main><ul><li>Item 1</li><li>Item 2</li></ul></main>");
        assert!(md.contains("- Item 1"), "{md}");
        assert!(md.contains("- Item 2"), "{md}");
        assert!(!md.contains("* Item"));
    }

    #[test]
    fn test_huge_ordered_list_start() {
        let md = render(r#"<main><ol start="18446744073709551615"><li>alpha</li><li>beta</li></ol></main>"#);
        assert!(md.contains("alpha"));
        assert!(md.contains("beta"));
    }

    #[test]
    fn test_inline_markup() {
        let md = render(r#"<main><p><strong>Bold</strong> and <em>soft</em>, see <a href="/api">the API</a>.</p></main>"#);
        assert!(md.contains("**Bold**"), "{md}");
        assert!(md.contains("*soft*"), "{md}");
        assert!(md.contains("[the API](/api)"), "{md}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let html = "<main><h2>A</h2><ul><li>x</li><li>y</li></ul><pre>code</pre></main>";
        assert_eq!(render(html), render(html));
    }

    #[test]
    fn test_rewrite_setext_only_after_paragraph_lines() {
        assert_eq!(rewrite_markdown("Sub\n---"), "## Sub");
        assert_eq!(rewrite_markdown("- item\n---"), "- item\n---");
        assert_eq!(rewrite_markdown("\n---"), "\n---");
    }

    #[test]
    fn test_rewrite_lines() {
        assert_eq!(rewrite_markdown("### Deep ###"), "### Deep");
        assert_eq!(rewrite_markdown("# C#"), "# C#");
        assert_eq!(rewrite_markdown("* * *"), "---");
        assert_eq!(rewrite_markdown("  + nested"), "  - nested");
        assert_eq!(rewrite_markdown("*emphasis* first"), "*emphasis* first");
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42u8), "converter panicked");
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let once = finalize("Body", "T");
        assert_eq!(finalize(&once, "T"), once);
    }
}
