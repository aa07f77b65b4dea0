//! Text sanitization for extracted page content
//!
//! Helpers shared by title extraction and the Markdown converter: whitespace
//! folding, invisible-character removal, and blank-line collapsing.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static MULTI_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static TITLE_SUFFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\|.*$").unwrap());

/// Fallback title for pages without a usable `<title>`
pub const UNTITLED: &str = "Untitled";

/// Remove zero-width spaces and similar invisible characters
///
/// # Examples
///
/// ```
/// use docharvest::parser::sanitize::remove_zero_width;
///
/// assert_eq!(remove_zero_width("Y\u{200B}.Map\u{FEFF}"), "Y.Map");
/// ```
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Fold every whitespace run (newlines included) into one space
///
/// Leading and trailing whitespace is kept as a single space so inline
/// fragments can be concatenated without gluing words together.
///
/// # Examples
///
/// ```
/// use docharvest::parser::sanitize::fold_whitespace;
///
/// assert_eq!(fold_whitespace("  Hello \n\t World "), " Hello World ");
/// ```
pub fn fold_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}

/// Collapse 3+ consecutive newlines to a single blank line
///
/// Whitespace on otherwise empty lines is kept, so indented blank lines in
/// code blocks survive.
///
/// # Examples
///
/// ```
/// use docharvest::parser::sanitize::collapse_newlines;
///
/// assert_eq!(collapse_newlines("Para 1\n\n\n\n\nPara 2"), "Para 1\n\nPara 2");
/// assert_eq!(collapse_newlines("x = 1\n    \nreturn x"), "x = 1\n    \nreturn x");
/// ```
pub fn collapse_newlines(text: &str) -> String {
    MULTI_NEWLINE_REGEX.replace_all(text, "\n\n").to_string()
}

/// Clean a raw `<title>` text
///
/// Drops a trailing ` | Site Name` suffix and folds whitespace; empty titles
/// become [`UNTITLED`].
///
/// # Examples
///
/// ```
/// use docharvest::parser::sanitize::clean_title;
///
/// assert_eq!(clean_title("Y.Map | Yjs Docs"), "Y.Map");
/// assert_eq!(clean_title("   "), "Untitled");
/// ```
pub fn clean_title(raw: &str) -> String {
    let text = remove_zero_width(raw);
    let text = fold_whitespace(text.trim());
    let text = TITLE_SUFFIX_REGEX.replace(&text, "");
    let text = text.trim();

    if text.is_empty() {
        UNTITLED.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_whitespace_keeps_edges() {
        assert_eq!(fold_whitespace("a  b"), "a b");
        assert_eq!(fold_whitespace("\n"), " ");
        assert_eq!(fold_whitespace(""), "");
    }

    #[test]
    fn test_collapse_newlines_keeps_single_blank() {
        assert_eq!(collapse_newlines("a\n\nb"), "a\n\nb");
        assert_eq!(collapse_newlines("a\nb"), "a\nb");
        assert_eq!(collapse_newlines("a\n\n\nb\n\n\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_collapse_newlines_keeps_indented_blank_lines() {
        let code = "def f():\n    x = 1\n    \n    return x";
        assert_eq!(collapse_newlines(code), code);
    }

    #[test]
    fn test_clean_title_variants() {
        assert_eq!(clean_title("Introduction"), "Introduction");
        assert_eq!(clean_title("  Shared Types |  Yjs "), "Shared Types");
        assert_eq!(clean_title("A | B | C"), "A");
        assert_eq!(clean_title("| Yjs Docs"), "Untitled");
        assert_eq!(clean_title("Multi\n  line\ttitle"), "Multi line title");
    }

    #[test]
    fn test_remove_zero_width() {
        assert_eq!(remove_zero_width("a\u{200B}b\u{200D}c"), "abc");
    }
}
