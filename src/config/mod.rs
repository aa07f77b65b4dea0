//! Configuration management for docharvest
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then `DOCHARVEST_*` environment variables, then command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Browser-like User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Markdown conversion configuration
    pub converter: ConverterConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Documentation site root; its host is the only host crawled
    pub base_url: String,

    /// Entry paths resolved against `base_url`
    pub seed_paths: Vec<String>,

    /// Maximum number of pages saved per run
    pub max_pages: usize,

    /// Politeness delay after each processed page, in milliseconds
    pub delay_ms: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,

    /// Path extensions that never point at documentation pages
    pub denied_extensions: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one markdown file per page
    pub dir: PathBuf,
}

/// Markdown conversion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Language tag for fenced code blocks without an explicit language
    pub code_language: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://docs.yjs.dev/"),
            seed_paths: [
                "/",
                "/getting-started/a-collaborative-editor",
                "/api/shared-types",
                "/api/document",
                "/api/y.map",
                "/api/y.array",
                "/api/y.text",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_pages: 50,
            delay_ms: 1000,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            denied_extensions: default_denied_extensions(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("docs/yjs"),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            code_language: String::from("javascript"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Binary, archive and media extensions skipped by the URL filter
pub fn default_denied_extensions() -> Vec<String> {
    [
        ".pdf", ".zip", ".tar.gz", ".tgz", ".gz", ".png", ".jpg", ".jpeg", ".gif", ".svg",
        ".webp", ".ico", ".mp4", ".mp3", ".woff", ".woff2", ".ttf", ".exe", ".dmg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Config {
    /// Load defaults, then apply environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// Missing sections and keys fall back to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Override values from `DOCHARVEST_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("DOCHARVEST_BASE_URL") {
            self.crawler.base_url = v;
        }
        if let Some(v) = env_parse::<usize>("DOCHARVEST_MAX_PAGES") {
            self.crawler.max_pages = v;
        }
        if let Some(v) = env_parse::<u64>("DOCHARVEST_DELAY_MS") {
            self.crawler.delay_ms = v;
        }
        if let Some(v) = env_parse::<u64>("DOCHARVEST_REQUEST_TIMEOUT") {
            self.crawler.request_timeout_secs = v;
        }
        if let Ok(v) = std::env::var("DOCHARVEST_USER_AGENT") {
            self.crawler.user_agent = v;
        }
        if let Ok(v) = std::env::var("DOCHARVEST_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("DOCHARVEST_CODE_LANGUAGE") {
            self.converter.code_language = v;
        }
        if let Ok(v) = std::env::var("DOCHARVEST_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Ok(v) = std::env::var("DOCHARVEST_LOG_FORMAT") {
            self.logging.format = v;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.crawler.max_pages == 0 {
            anyhow::bail!("max_pages must be greater than 0");
        }

        if self.crawler.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.output.dir.as_os_str().is_empty() {
            anyhow::bail!("output directory must not be empty");
        }

        Ok(())
    }

    /// Parsed base URL; must be http(s) with a host
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.crawler.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.crawler.base_url))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("base_url must use http or https: {url}");
        }
        if url.host_str().is_none() {
            anyhow::bail!("base_url has no host: {url}");
        }

        Ok(url)
    }

    /// Host every crawled page must belong to
    pub fn host(&self) -> Result<String> {
        let url = self.base_url()?;
        url.host_str()
            .map(|h| h.to_string())
            .context("base_url has no host")
    }

    /// Seed URLs: `seed_paths` resolved against `base_url`, or the base URL alone
    pub fn seed_urls(&self) -> Result<Vec<String>> {
        let base = self.base_url()?;

        if self.crawler.seed_paths.is_empty() {
            return Ok(vec![base.to_string()]);
        }

        self.crawler
            .seed_paths
            .iter()
            .map(|path| {
                base.join(path)
                    .map(|u| u.to_string())
                    .with_context(|| format!("Invalid seed path: {path}"))
            })
            .collect()
    }

    /// Request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Politeness delay as Duration
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.crawler.delay_ms)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.host().unwrap(), "docs.yjs.dev");
    }

    #[test]
    fn test_invalid_max_pages() {
        let mut config = Config::default();
        config.crawler.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = Config::default();
        config.crawler.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.crawler.base_url = "ftp://docs.example.dev/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_urls_resolved_against_base() {
        let mut config = Config::default();
        config.crawler.base_url = "https://docs.example.dev/".to_string();
        config.crawler.seed_paths = vec!["/".into(), "guide/intro".into()];

        let seeds = config.seed_urls().unwrap();
        assert_eq!(
            seeds,
            vec![
                "https://docs.example.dev/".to_string(),
                "https://docs.example.dev/guide/intro".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_seed_paths_uses_base() {
        let mut config = Config::default();
        config.crawler.base_url = "https://docs.example.dev/start".to_string();
        config.crawler.seed_paths.clear();

        assert_eq!(
            config.seed_urls().unwrap(),
            vec!["https://docs.example.dev/start".to_string()]
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [crawler]
            base_url = "https://docs.example.dev/"
            max_pages = 5

            [output]
            dir = "out/docs"
            "#,
        )
        .unwrap();

        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(config.crawler.delay_ms, 1000);
        assert_eq!(config.output.dir, PathBuf::from("out/docs"));
        assert_eq!(config.converter.code_language, "javascript");
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.delay(), Duration::from_millis(1000));
    }
}
