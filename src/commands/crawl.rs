use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use docharvest::config::Config;
use docharvest::crawler::{Crawler, DocsFetcher};

/// Command-line overrides for the crawl command
#[derive(Debug, Default)]
pub struct CrawlArgs {
    pub base_url: Option<String>,
    pub seeds: Vec<String>,
    pub max_pages: Option<usize>,
    pub delay_ms: Option<u64>,
    pub output: Option<PathBuf>,
    pub code_language: Option<String>,
}

impl CrawlArgs {
    /// Apply flags on top of file and environment settings
    fn apply(self, config: &mut Config) {
        if let Some(base_url) = self.base_url {
            config.crawler.base_url = base_url;
        }
        if !self.seeds.is_empty() {
            config.crawler.seed_paths = self.seeds;
        }
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(delay_ms) = self.delay_ms {
            config.crawler.delay_ms = delay_ms;
        }
        if let Some(output) = self.output {
            config.output.dir = output;
        }
        if let Some(code_language) = self.code_language {
            config.converter.code_language = code_language;
        }
    }
}

pub async fn crawl(mut config: Config, args: CrawlArgs) -> Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    let seeds = config.seed_urls()?;

    println!("Starting documentation crawl");
    println!("============================");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Seeds: {}", seeds.len());
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Output: {}", config.output.dir.display());

    let fetcher = DocsFetcher::new(&config).context("Failed to create HTTP client")?;
    let mut crawler = Crawler::new(&config, fetcher).context("Failed to initialize crawler")?;

    let shutdown = crawler.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current page");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let report = crawler.run(seeds).await;
    report.print_summary();

    Ok(())
}
