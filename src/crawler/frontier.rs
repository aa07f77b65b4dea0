//! Crawl frontier and visit bookkeeping

use std::collections::{HashSet, VecDeque};

/// FIFO queue of discovered URLs plus the visited/failed sets
///
/// Invariants:
/// - a URL is never queued twice, nor queued after it has been visited
/// - a URL moves to `visited` the moment it is dequeued, so it is processed
///   at most once per run regardless of the fetch outcome
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    failed: HashSet<String>,
}

impl Frontier {
    /// Create an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `url` unless it was already queued or visited
    ///
    /// Returns `true` when the URL was added.
    pub fn push(&mut self, url: impl Into<String>) -> bool {
        let url = url.into();
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Append every URL in order; returns how many were new
    pub fn extend<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for url in urls {
            if self.push(url) {
                added += 1;
            }
        }
        added
    }

    /// Dequeue the next unvisited URL and mark it visited
    pub fn next(&mut self) -> Option<String> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Record a URL whose fetch or processing failed
    pub fn mark_failed(&mut self, url: &str) {
        self.visited.insert(url.to_string());
        self.failed.insert(url.to_string());
    }

    /// Whether `url` has already been dequeued
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Whether `url` is waiting in the queue
    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Number of URLs waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// No URL waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs dequeued so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Failed URLs in sorted order
    pub fn failed_urls(&self) -> Vec<String> {
        let mut failed: Vec<String> = self.failed.iter().cloned().collect();
        failed.sort();
        failed
    }

    /// URLs still queued, in order
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}
