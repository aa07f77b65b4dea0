//! Shared helpers
//!
//! This module holds the per-domain error types used across the crate.

pub mod error;
