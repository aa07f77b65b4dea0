//! docharvest - Polite documentation site crawler
//!
//! Crawls a single documentation site breadth-first, extracts the main content
//! of every page and saves it as a Markdown file with a metadata header.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Crawl engine, frontier, link filter and HTTP fetching
//! - [`parser`] - HTML parsing and main-content extraction
//! - [`markdown`] - HTML to Markdown conversion
//! - [`models`] - Core data structures and the run report
//! - [`storage`] - File naming and Markdown output
//! - [`utils`] - Domain error types
//!
//! # Example
//!
//! ```no_run
//! use docharvest::config::Config;
//! use docharvest::crawler::{Crawler, DocsFetcher};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = DocsFetcher::new(&config)?;
//!     let mut crawler = Crawler::new(&config, fetcher)?;
//!     let report = crawler.run(config.seed_urls()?).await;
//!     report.print_summary();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod markdown;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{Crawler, DocsFetcher, FetchedPage, PageFetcher, UrlFilter};
    pub use crate::error::{Error, ErrorCategory, HarvestErrorTrait, Result};
    pub use crate::markdown::{ConversionOptions, MarkdownConverter};
    pub use crate::models::{CrawlReport, PageRecord};
    pub use crate::parser::{ContentExtractor, ContentRoot};
    pub use crate::storage::MarkdownWriter;
}

// Direct re-exports for convenience
pub use models::{CrawlReport, PageRecord};
