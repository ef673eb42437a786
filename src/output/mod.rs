//! Output module for crawl results and progress
//!
//! This module handles:
//! - Writing processed pages as JSON lines
//! - Reporting progress while the crawl runs
//! - Recording crawl statistics

mod jsonl;
mod progress;
pub mod stats;
mod traits;

pub use jsonl::{session_id, JsonlSink};
pub use progress::{LogProgress, NoProgress};
pub use stats::{print_statistics, CrawlReport, CrawlStatistics};
pub use traits::{
    MemorySink, OutputError, OutputResult, OutputSink, PageRecord, ProgressReporter,
};
