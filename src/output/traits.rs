//! Output sink traits and types
//!
//! This module defines the trait interface for output sinks and progress
//! reporters, and the record emitted for every processed page.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A successfully fetched and parsed page
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    /// The page URL (normalized)
    pub url: String,

    /// Page title (if available)
    pub title: Option<String>,

    /// Extracted visible text
    pub text: String,

    /// Content-aware score of the page itself
    pub score: f64,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

/// Receives parsed results, one call per emitted page
///
/// Errors are reported back to the coordinator, which logs and counts them
/// without stopping the crawl.
pub trait OutputSink: Send {
    /// Records one processed page
    fn emit(&mut self, page: &PageRecord) -> OutputResult<()>;

    /// Flushes buffered output; called once when the crawl ends
    fn flush(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Observes crawl progress after every iteration
///
/// Purely observational; nothing it does can affect control flow.
pub trait ProgressReporter: Send {
    fn report(&mut self, current_url: &str, frontier_size: usize);
}

/// Sink that keeps records in memory
///
/// Clones share one buffer, so a caller can keep a handle and read back what
/// a boxed copy inside the coordinator received.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pages: Arc<Mutex<Vec<PageRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record emitted so far
    pub fn pages(&self) -> Vec<PageRecord> {
        self.pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputSink for MemorySink {
    fn emit(&mut self, page: &PageRecord) -> OutputResult<()> {
        self.pages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(page.clone());
        Ok(())
    }
}
