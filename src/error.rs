//! Unified error handling for the docharvest crate
//!
//! Domain-specific errors live in [`crate::utils::error`]; this module wraps
//! them into a single [`Error`] enum for library users and classifies them
//! with [`ErrorCategory`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use docharvest::error::{Error, HarvestErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         eprintln!("skipping page: {err}");
//!     } else {
//!         eprintln!("fatal: {err}");
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::utils::error::{CrawlerError, FetchError, ParseError, StorageError};

/// Common trait for all docharvest error types
pub trait HarvestErrorTrait: std::error::Error {
    /// Whether the crawl can continue past this error.
    ///
    /// Per-page failures are recoverable; failures that affect the whole run
    /// (output directory, configuration) are not.
    fn is_recoverable(&self) -> bool;

    /// Error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, status)
    Network,
    /// Parsing and content extraction errors
    Parsing,
    /// Storage and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HarvestErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidUrl(_))
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) => ErrorCategory::Parsing,
            _ => ErrorCategory::Network,
        }
    }
}

impl HarvestErrorTrait for ParseError {
    fn is_recoverable(&self) -> bool {
        true
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl HarvestErrorTrait for StorageError {
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Write { .. } | Self::Template(_) | Self::NamesExhausted(_))
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}

impl HarvestErrorTrait for CrawlerError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Parse(e) => e.is_recoverable(),
            Self::Storage(e) => e.is_recoverable(),
            Self::InvalidSeed(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => e.category(),
            Self::Parse(e) => e.category(),
            Self::Storage(e) => e.category(),
            Self::InvalidSeed(_) => ErrorCategory::Config,
        }
    }
}

/// Unified error type for the docharvest crate
#[derive(Error, Debug)]
pub enum Error {
    /// Crawler-related errors
    #[error("Crawler error: {0}")]
    Crawler(#[from] CrawlerError),

    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse-specific errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Anything else, described by its message
    #[error("{0}")]
    Other(String),
}

impl HarvestErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Crawler(e) => e.is_recoverable(),
            Self::Fetch(e) => e.is_recoverable(),
            Self::Parse(e) => e.is_recoverable(),
            Self::Storage(e) => e.is_recoverable(),
            Self::Config(_) => false,
            Self::Other(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Crawler(e) => e.category(),
            Self::Fetch(e) => e.category(),
            Self::Parse(e) => e.category(),
            Self::Storage(e) => e.category(),
            Self::Config(_) => ErrorCategory::Config,
            Self::Other(_) => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error from a message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
