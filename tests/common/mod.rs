//! Common test utilities

use async_trait::async_trait;
use docharvest::config::Config;
use docharvest::crawler::{FetchedPage, PageFetcher};
use docharvest::utils::error::FetchError;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Host used by in-memory crawl scenarios
#[allow(dead_code)]
pub const HOST: &str = "docs.example.dev";

/// Absolute URL on [`HOST`]
#[allow(dead_code)]
pub fn site_url(path: &str) -> String {
    format!("https://{HOST}{path}")
}

/// Config pointing at [`HOST`] with no delay and output under `dir`
#[allow(dead_code)]
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.base_url = site_url("/");
    config.crawler.seed_paths = Vec::new();
    config.crawler.delay_ms = 0;
    config.output.dir = dir.to_path_buf();
    config
}

/// Minimal documentation page
#[allow(dead_code)]
pub fn doc_page(title: &str, main: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>{title} | Example Docs</title></head>\
         <body><nav><a href=\"/\">Home</a></nav><main>{main}</main></body></html>"
    )
}

/// In-memory fetcher serving canned pages
///
/// Unknown URLs answer 404. Every request is recorded in call order.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    pages: Arc<HashMap<String, (u16, String)>>,
    calls: Arc<Mutex<Vec<String>>>,
    /// Raised on every request when present
    trip_flag: Arc<Mutex<Option<Arc<AtomicBool>>>>,
}

#[allow(dead_code)]
impl StaticFetcher {
    pub fn new<I, U, B>(pages: I) -> Self
    where
        I: IntoIterator<Item = (U, B)>,
        U: Into<String>,
        B: Into<String>,
    {
        let pages = pages
            .into_iter()
            .map(|(url, body)| (url.into(), (200, body.into())))
            .collect();
        Self {
            pages: Arc::new(pages),
            ..Default::default()
        }
    }

    /// Serve `url` with `status` and an empty body
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        let mut pages = (*self.pages).clone();
        pages.insert(url.to_string(), (status, String::new()));
        self.pages = Arc::new(pages);
        self
    }

    /// Raise `flag` as soon as a page is fetched; shared by all clones
    pub fn trip_on_fetch(&self, flag: Arc<AtomicBool>) {
        *self.trip_flag.lock().unwrap() = Some(flag);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(flag) = self.trip_flag.lock().unwrap().as_ref() {
            flag.store(true, Ordering::SeqCst);
        }

        match self.pages.get(url) {
            Some((status, body)) if (200..300).contains(status) => Ok(FetchedPage {
                url: url.to_string(),
                status: *status,
                body: body.clone(),
            }),
            Some((status, _)) => Err(FetchError::Status(*status)),
            None => Err(FetchError::Status(404)),
        }
    }
}
