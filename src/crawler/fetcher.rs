//! HTTP fetching for documentation pages
//!
//! This module provides the [`PageFetcher`] seam used by the crawl engine and
//! its reqwest-backed implementation:
//! - Bounded per-request timeout
//! - Browser-like default headers
//! - Charset detection from `Content-Type` or `<meta charset>`
//!
//! Fetching never retries; a failed URL is reported once and left alone.

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{Client, Response};
use std::time::Duration;

use crate::config::Config;
use crate::crawler::headers::build_default_headers;
use crate::utils::error::FetchError;

/// Successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,

    /// HTTP status code (always 2xx)
    pub status: u16,

    /// Decoded response body
    pub body: String,
}

/// Source of page bodies for the crawl engine
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`, failing on transport errors and non-success statuses
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// reqwest-backed fetcher
pub struct DocsFetcher {
    /// HTTP client with configured timeout, compression and headers
    client: Client,

    /// Per-request timeout
    timeout: Duration,
}

impl DocsFetcher {
    /// Create a fetcher from crawler configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Self::with_settings(&config.crawler.user_agent, config.request_timeout())
    }

    /// Create a fetcher with an explicit user agent and timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_settings(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .default_headers(build_default_headers(user_agent))
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn decode_response(&self, response: Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await.map_err(FetchError::from_reqwest)?;

        decode_bytes(&bytes, &content_type)
    }
}

#[async_trait]
impl PageFetcher for DocsFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        tracing::debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = self.decode_response(response).await?;

        Ok(FetchedPage {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

/// Decode a response body to UTF-8
///
/// Strategy, in order:
/// 1. `charset=` parameter of the `Content-Type` header
/// 2. `<meta charset=...>` within the first 1024 bytes
/// 3. UTF-8, replacing invalid sequences
///
/// # Errors
///
/// Returns `FetchError::Decode` if a declared charset is unknown
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    let declared = charset_param(content_type).or_else(|| meta_charset(bytes));

    let encoding = match declared {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| FetchError::Decode(format!("Unsupported charset: {label}")))?,
        None => UTF_8,
    };

    let (cow, _encoding, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!(encoding = encoding.name(), "Replaced invalid byte sequences");
    }

    Ok(cow.into_owned())
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_ascii_lowercase())
        } else {
            None
        }
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let value: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
