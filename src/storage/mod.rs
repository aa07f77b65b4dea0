//! Page persistence
//!
//! This module names converted pages after their URLs and writes them as
//! Markdown files with a metadata header.

pub mod markdown;
pub mod namer;

pub use markdown::MarkdownWriter;
pub use namer::name_for;
