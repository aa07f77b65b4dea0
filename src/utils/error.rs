//! Error types for the docharvest crawler
//!
//! This module defines the per-domain error types used throughout the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching a page
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport error (connection refused, TLS, body read, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// Server answered with a non-success status code
    #[error("Unexpected status: {0}")]
    Status(u16),

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Map a reqwest error, separating timeouts from other transport failures
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Errors that can occur while extracting content from a parsed page
#[derive(Error, Debug)]
pub enum ParseError {
    /// Document has no `<body>` element
    #[error("Document has no body")]
    MissingBody,

    /// Extracted region rendered to nothing
    #[error("Page produced no markdown content")]
    EmptyContent,

    /// HTML to Markdown conversion aborted on this page
    #[error("Markdown conversion failed: {0}")]
    Conversion(String),
}

/// Errors that can occur while writing pages to disk
#[derive(Error, Debug)]
pub enum StorageError {
    /// Output directory could not be created
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory could not be listed
    #[error("Failed to read output directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata header template failed to render
    #[error("Failed to render page template: {0}")]
    Template(String),

    /// Every suffixed candidate for a slug is already taken
    #[error("No free file name left for {0}")]
    NamesExhausted(String),
}

/// General crawler errors
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Seed or base URL is unusable
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),
}
