//! Pre-conversion pass over an extracted content root
//!
//! Elements that never render are detached, and every top-level `<pre>` is
//! lifted out of the HTML and replaced by a placeholder paragraph. The lifted
//! blocks are rendered here as fenced code and put back after conversion, so
//! their text and language tag reach the output untouched.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};

/// Elements with no Markdown rendering
pub const SKIPPED_TAGS: &[&str] = &[
    "button", "canvas", "embed", "iframe", "input", "noscript", "object", "script", "select",
    "style", "svg", "template", "textarea",
];

lazy_static! {
    static ref PRE_SELECTOR: Selector =
        Selector::parse("pre").expect("Invalid CSS selector: pre");
    static ref SKIPPED_SELECTOR: Selector =
        Selector::parse(&SKIPPED_TAGS.join(", ")).expect("Invalid CSS selector list");
}

/// HTML handed to the converter plus the code blocks lifted out of it
#[derive(Debug, Default)]
pub struct PreparedHtml {
    /// Serialized content with placeholders in place of `<pre>` blocks
    pub html: String,
    /// Fenced blocks, indexed by placeholder number
    pub blocks: Vec<String>,
}

/// Placeholder paragraph text for block `index`
///
/// Letters and digits only, so the converter passes it through unescaped.
pub fn placeholder(index: usize) -> String {
    format!("DOCHARVESTFENCE{index}X")
}

/// Strip non-rendering elements and lift code blocks out of `document`
///
/// `document` is left untouched; the work happens on a clone.
pub fn prepare(document: &Html, default_language: &str) -> PreparedHtml {
    let mut working = document.clone();
    strip_skipped(&mut working);

    let mut html = working.root_element().inner_html();
    let mut blocks = Vec::new();

    for pre in working.select(&PRE_SELECTOR) {
        if has_pre_ancestor(pre) {
            continue;
        }
        let serialized = pre.html();
        if !html.contains(&serialized) {
            continue;
        }
        let marker = format!("<p>{}</p>", placeholder(blocks.len()));
        html = html.replacen(&serialized, &marker, 1);
        blocks.push(fence(pre, default_language));
    }

    PreparedHtml { html, blocks }
}

/// Swap placeholders in converted text back for their fenced blocks
pub fn restore(markdown: &str, blocks: &[String]) -> String {
    let mut out = markdown.to_string();
    for (index, block) in blocks.iter().enumerate().rev() {
        out = out.replacen(&placeholder(index), block, 1);
    }
    out
}

/// Fenced code block for a `<pre>` element; empty when it holds no text
pub fn fence(pre: ElementRef<'_>, default_language: &str) -> String {
    let code = pre
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "code");
    let language = code
        .and_then(language_class)
        .or_else(|| language_class(pre))
        .unwrap_or_else(|| default_language.to_string());

    let text = raw_text(pre);
    let text = text.strip_prefix('\n').unwrap_or(&text);
    let text = text.trim_end_matches('\n');
    if text.trim().is_empty() {
        return String::new();
    }

    let fence = if text.contains("```") { "~~~" } else { "```" };
    format!("{fence}{language}\n{text}\n{fence}")
}

/// Detach every non-rendering element; returns how many went
fn strip_skipped(working: &mut Html) -> usize {
    let ids: Vec<_> = working.select(&SKIPPED_SELECTOR).map(|el| el.id()).collect();

    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = working.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}

fn has_pre_ancestor(element: ElementRef<'_>) -> bool {
    element
        .ancestors()
        .any(|node| node.value().as_element().is_some_and(|e| e.name() == "pre"))
}

/// Text of `element` verbatim, with `<br>` as newline
fn raw_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Language named by a `language-*` or `lang-*` class
fn language_class(element: ElementRef<'_>) -> Option<String> {
    element.value().classes().find_map(|class| {
        class
            .strip_prefix("language-")
            .or_else(|| class.strip_prefix("lang-"))
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared(html: &str) -> PreparedHtml {
        prepare(&Html::parse_fragment(html), "javascript")
    }

    #[test]
    fn test_code_block_lifted_behind_placeholder() {
        let out = prepared(r#"<p>a</p><pre><code class="language-rust">let x = 1;</code></pre>"#);
        assert_eq!(out.html, "<p>a</p><p>DOCHARVESTFENCE0X</p>");
        assert_eq!(out.blocks, vec!["```rust\nlet x = 1;\n```".to_string()]);
    }

    #[test]
    fn test_default_language_and_pre_class() {
        let out = prepared("<pre><code>new Y.Doc()\n</code></pre><pre class=\"lang-ts\">let a</pre>");
        assert_eq!(
            out.blocks,
            vec![
                "```javascript\nnew Y.Doc()\n```".to_string(),
                "```ts\nlet a\n```".to_string(),
            ]
        );
        assert_eq!(out.html, "<p>DOCHARVESTFENCE0X</p><p>DOCHARVESTFENCE1X</p>");
    }

    #[test]
    fn test_whitespace_only_code_lines_survive() {
        let out = prepared("<pre><code>def f():\n    x = 1\n    \n    return x</code></pre>");
        assert_eq!(
            out.blocks[0],
            "```javascript\ndef f():\n    x = 1\n    \n    return x\n```"
        );
    }

    #[test]
    fn test_backticks_in_code_switch_fence() {
        let out = prepared("<pre>```md\nx\n```</pre>");
        assert!(out.blocks[0].starts_with("~~~javascript\n"));
        assert!(out.blocks[0].ends_with("\n~~~"));
    }

    #[test]
    fn test_br_inside_pre_is_newline() {
        let out = prepared("<pre>a<br>b</pre>");
        assert_eq!(out.blocks[0], "```javascript\na\nb\n```");
    }

    #[test]
    fn test_skipped_elements_removed() {
        let out = prepared(
            "<p>Keep</p><script>alert(1)</script><style>p{}</style><svg><title>x</title></svg>\
             <button>Copy</button>",
        );
        assert_eq!(out.html, "<p>Keep</p>");
        assert!(out.blocks.is_empty());
    }

    #[test]
    fn test_prepare_leaves_source_intact() {
        let document = Html::parse_fragment("<pre>x</pre><script>y()</script>");
        let _ = prepare(&document, "javascript");
        assert!(document.root_element().inner_html().contains("<script>"));
    }

    #[test]
    fn test_restore_in_place() {
        let blocks = vec!["```js\na\n```".to_string(), "```js\nb\n```".to_string()];
        let md = format!("Intro\n\n{}\n\nMid\n\n{}", placeholder(0), placeholder(1));
        assert_eq!(
            restore(&md, &blocks),
            "Intro\n\n```js\na\n```\n\nMid\n\n```js\nb\n```"
        );
    }

    #[test]
    fn test_many_placeholders_do_not_collide() {
        let blocks: Vec<String> = (0..12).map(|i| format!("[{i}]")).collect();
        let md: Vec<String> = (0..12).map(placeholder).collect();
        assert_eq!(restore(&md.join(" "), &blocks), "[0] [1] [2] [3] [4] [5] [6] [7] [8] [9] [10] [11]");
    }
}
