//! Breadth-first documentation crawling
//!
//! This module implements the crawl engine: it drains the frontier one page
//! at a time, saves each page's main content as Markdown and feeds
//! discovered in-site links back into the frontier. A fixed politeness delay
//! separates consecutive pages.

pub mod fetcher;
pub mod frontier;
pub mod headers;
pub mod url;

pub use fetcher::{DocsFetcher, FetchedPage, PageFetcher};
pub use frontier::Frontier;
pub use self::url::UrlFilter;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::HarvestErrorTrait;
use crate::markdown::{finalize, ConversionOptions, MarkdownConverter};
use crate::models::{CrawlReport, PageRecord};
use crate::parser::{extract_title, parse_document, ContentExtractor};
use crate::storage::MarkdownWriter;
use crate::utils::error::{CrawlerError, ParseError};

/// Crawl engine; one instance per run
pub struct Crawler<F: PageFetcher> {
    /// Page source
    fetcher: F,

    /// Same-host link filter
    filter: UrlFilter,

    extractor: ContentExtractor,
    converter: MarkdownConverter,

    /// Output writer
    writer: MarkdownWriter<'static>,

    /// Queued, visited and failed URLs
    frontier: Frontier,

    /// Stop after this many saved pages
    max_pages: usize,

    /// Pause between pages
    delay: Duration,

    saved_files: Vec<PathBuf>,

    /// Set by the Ctrl-C handler
    shutdown: Arc<AtomicBool>,
}

impl<F: PageFetcher> Crawler<F> {
    /// Create a crawler for `config`, creating the output directory
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::InvalidSeed` for an unusable base URL and
    /// `CrawlerError::Storage` if the output directory cannot be prepared.
    pub fn new(config: &Config, fetcher: F) -> Result<Self, CrawlerError> {
        let host = config
            .host()
            .map_err(|e| CrawlerError::InvalidSeed(format!("{e:#}")))?;
        let port = config
            .base_url()
            .map_err(|e| CrawlerError::InvalidSeed(format!("{e:#}")))?
            .port();
        let filter =
            UrlFilter::new(host, config.crawler.denied_extensions.clone()).with_port(port);
        let writer = MarkdownWriter::new(&config.output.dir)?;
        let converter = MarkdownConverter::new(ConversionOptions::from(&config.converter));

        Ok(Self {
            fetcher,
            filter,
            extractor: ContentExtractor::new(),
            converter,
            writer,
            frontier: Frontier::new(),
            max_pages: config.crawler.max_pages,
            delay: config.delay(),
            saved_files: Vec::new(),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag that stops the crawl after the current page once set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Frontier state, for inspection after a run
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Pages saved so far
    pub fn saved(&self) -> usize {
        self.saved_files.len()
    }

    /// Crawl from `seeds` until the frontier drains, the page cap is hit or
    /// shutdown is requested
    pub async fn run<I, S>(&mut self, seeds: I) -> CrawlReport
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let started = Instant::now();
        let seeded = self.frontier.extend(seeds);

        tracing::info!(
            seeds = seeded,
            host = %self.filter.host(),
            output = %self.writer.output_dir().display(),
            max_pages = self.max_pages,
            "Starting crawl"
        );

        let mut interrupted = false;
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!(saved = self.saved(), "Shutdown requested, stopping crawl");
                interrupted = true;
                break;
            }
            if self.saved() >= self.max_pages {
                tracing::warn!(
                    max_pages = self.max_pages,
                    pending = self.frontier.len(),
                    "Page limit reached"
                );
                break;
            }
            let Some(url) = self.frontier.next() else {
                break;
            };

            match self.process(&url).await {
                Ok(Some(path)) => self.saved_files.push(path),
                Ok(None) => {}
                Err(e) => {
                    if e.is_recoverable() {
                        tracing::warn!(url = %url, error = %e, category = %e.category(), "Failed to process page");
                    } else {
                        tracing::error!(url = %url, error = %e, category = %e.category(), "Failed to process page");
                    }
                    self.frontier.mark_failed(&url);
                }
            }

            let more_work = !self.frontier.is_empty() && self.saved() < self.max_pages;
            if more_work && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        let report = CrawlReport {
            saved: self.saved(),
            failed_urls: self.frontier.failed_urls(),
            saved_files: self.saved_files.clone(),
            output_dir: self.writer.output_dir().to_path_buf(),
            interrupted,
            pending: self.frontier.len(),
            duration: started.elapsed(),
        };

        tracing::info!(
            saved = report.saved,
            failed = report.failed(),
            visited = self.frontier.visited_count(),
            elapsed_ms = report.duration.as_millis() as u64,
            "Crawl finished"
        );

        report
    }

    /// Fetch one page, enqueue its links and save its content
    ///
    /// Returns the written file, or `None` when the page had nothing worth
    /// saving.
    ///
    /// # Errors
    ///
    /// Fetch, conversion and write failures; the caller records the URL as
    /// failed.
    pub async fn process(&mut self, url: &str) -> Result<Option<PathBuf>, CrawlerError> {
        let page = self.fetcher.fetch(url).await?;
        tracing::debug!(url = %page.url, status = page.status, bytes = page.body.len(), "Fetched page");

        self.handle_page(&page)
    }

    fn handle_page(&mut self, page: &FetchedPage) -> Result<Option<PathBuf>, CrawlerError> {
        let document = parse_document(&page.body);

        let links = self.filter.extract_links(&document, &page.url);
        let found = links.len();
        let added = self.frontier.extend(links);
        tracing::debug!(url = %page.url, found, added, "Harvested links");

        let title = extract_title(&document);
        let body = match self.extractor.extract(&document) {
            Some(root) => self.converter.render(&root)?,
            None => {
                tracing::debug!(url = %page.url, reason = %ParseError::MissingBody, "Skipping page");
                return Ok(None);
            }
        };
        if body.is_empty() {
            tracing::debug!(url = %page.url, reason = %ParseError::EmptyContent, "Skipping page");
            return Ok(None);
        }

        let markdown = finalize(&body, &title);
        let record = PageRecord::new(page.url.as_str(), title, markdown);
        let path = self.writer.save(&record)?;

        tracing::info!(
            url = %page.url,
            file = %path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            "Saved page"
        );
        Ok(Some(path))
    }
}
