// Core data structures for the docharvest crawler

use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

/// One converted page ready to be written
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub markdown: String,
    pub scraped_at: DateTime<Local>,
}

impl PageRecord {
    /// Create with current local timestamp
    pub fn new(url: impl Into<String>, title: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            markdown: markdown.into(),
            scraped_at: Local::now(),
        }
    }

    /// Timestamp as written into the metadata header
    pub fn scraped_at_display(&self) -> String {
        self.scraped_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Outcome of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Pages written to disk
    pub saved: usize,
    /// URLs whose fetch or save failed, sorted
    pub failed_urls: Vec<String>,
    /// Written files in save order
    pub saved_files: Vec<PathBuf>,
    /// Output directory of the run
    pub output_dir: PathBuf,
    /// Run stopped by a shutdown request
    pub interrupted: bool,
    /// Frontier entries left when the run ended
    pub pending: usize,
    pub duration: Duration,
}

impl CrawlReport {
    pub fn failed(&self) -> usize {
        self.failed_urls.len()
    }

    /// Saved pages per minute
    pub fn save_rate(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.saved as f64 / secs * 60.0
        }
    }

    /// Human-readable run summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let heading = if self.interrupted {
            "Crawl Summary (interrupted)"
        } else {
            "Crawl Summary"
        };
        let _ = writeln!(out, "{heading}");
        let _ = writeln!(out, "{}", "=".repeat(heading.len()));
        let _ = writeln!(out, "Pages saved: {}", self.saved);
        let _ = writeln!(out, "Failed URLs: {}", self.failed());
        for url in &self.failed_urls {
            let _ = writeln!(out, "  - {url}");
        }
        if self.pending > 0 {
            let _ = writeln!(out, "Not visited: {}", self.pending);
        }
        let _ = writeln!(out, "Duration: {:.1}s", self.duration.as_secs_f64());
        let _ = writeln!(out, "Output directory: {}", self.output_dir.display());

        if !self.saved_files.is_empty() {
            let _ = writeln!(out, "\nCreated files");
            let _ = writeln!(out, "-------------");
            for path in &self.saved_files {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let _ = writeln!(out, "  {name}");
            }
        }
        out
    }

    /// Print [`Self::summary`] to stdout
    pub fn print_summary(&self) {
        print!("\n{}", self.summary());
    }
}
