//! File names for saved pages
//!
//! A page is named after the last segment of its URL path. Names already
//! taken in the output directory get a numeric `-N` suffix.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Name used for the site root and segments that sanitize to nothing
pub const INDEX_NAME: &str = "index.md";

const EXTENSION: &str = ".md";

static ILLEGAL_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F\x7F]"#).unwrap());

static DASH_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Collision-free file name for `url`
///
/// # Examples
///
/// ```
/// use docharvest::storage::namer::name_for;
/// use std::collections::HashSet;
///
/// let mut taken = HashSet::new();
/// assert_eq!(name_for("https://docs.yjs.dev/api/y.doc", &taken), "y.doc.md");
///
/// taken.insert("intro.md".to_string());
/// assert_eq!(name_for("https://docs.yjs.dev/guide/intro", &taken), "intro-1.md");
/// ```
pub fn name_for(url: &str, existing: &HashSet<String>) -> String {
    let base = base_name(url);
    if !existing.contains(&base) {
        return base;
    }

    let stem = base.strip_suffix(EXTENSION).unwrap_or(&base);
    (1u64..)
        .map(|n| format!("{stem}-{n}{EXTENSION}"))
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or(base)
}

/// Unsuffixed file name for `url`
pub fn base_name(url: &str) -> String {
    match last_segment(url) {
        Some(segment) => {
            let slug = slugify(&segment);
            let stem = slug.strip_suffix(EXTENSION).unwrap_or(&slug);
            if stem.is_empty() {
                INDEX_NAME.to_string()
            } else {
                format!("{stem}{EXTENSION}")
            }
        }
        None => INDEX_NAME.to_string(),
    }
}

/// Sanitize one decoded path segment into a lowercase slug
///
/// # Examples
///
/// ```
/// use docharvest::storage::namer::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("a<b>:c"), "a-b-c");
/// ```
pub fn slugify(segment: &str) -> String {
    let replaced = ILLEGAL_CHARS_REGEX.replace_all(segment, "-");
    let collapsed = DASH_RUN_REGEX.replace_all(&replaced, "-");
    collapsed.trim_matches('-').to_lowercase()
}

/// Last non-empty path segment, percent-decoded
fn last_segment(url: &str) -> Option<String> {
    let raw = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()?
            .filter(|s| !s.is_empty())
            .last()
            .map(str::to_string),
        Err(_) => {
            let path = url.split(['?', '#']).next().unwrap_or("");
            path.split('/')
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string)
        }
    }?;

    Some(percent_decode_str(&raw).decode_utf8_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_root_is_index() {
        assert_eq!(name_for("https://docs.example.dev/", &HashSet::new()), "index.md");
        assert_eq!(name_for("https://docs.example.dev", &HashSet::new()), "index.md");
    }

    #[test]
    fn test_last_segment_with_trailing_slash() {
        assert_eq!(
            name_for("https://docs.example.dev/guide/intro/", &HashSet::new()),
            "intro.md"
        );
    }

    #[test]
    fn test_percent_decoding_and_case() {
        assert_eq!(
            name_for("https://docs.example.dev/api/Shared%20Types", &HashSet::new()),
            "shared-types.md"
        );
    }

    #[test]
    fn test_existing_extension_kept() {
        assert_eq!(
            name_for("https://docs.example.dev/notes/readme.md", &HashSet::new()),
            "readme.md"
        );
    }

    #[test]
    fn test_segment_sanitizing_to_nothing() {
        assert_eq!(name_for("https://docs.example.dev/%3F%2A", &HashSet::new()), "index.md");
    }

    #[test]
    fn test_collision_suffixes() {
        let url = "https://docs.example.dev/a/intro";
        assert_eq!(name_for(url, &taken(&["intro.md"])), "intro-1.md");
        assert_eq!(name_for(url, &taken(&["intro.md", "intro-1.md"])), "intro-2.md");
        assert_eq!(name_for(url, &taken(&["intro.md", "intro-2.md"])), "intro-1.md");
    }

    #[test]
    fn test_index_collision() {
        assert_eq!(
            name_for("https://docs.example.dev/", &taken(&["index.md"])),
            "index-1.md"
        );
    }

    #[test]
    fn test_unparseable_input_uses_raw_path() {
        assert_eq!(base_name("/guide/Setup?x=1"), "setup.md");
        assert_eq!(base_name(""), "index.md");
    }
}
