//! Crawl statistics
//!
//! Counters collected by the coordinator while a crawl runs, and the final
//! report returned from [`Coordinator::run`](crate::crawler::Coordinator::run).

use crate::state::CrawlState;
use serde::Serialize;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    /// Fetch attempts that returned content
    pub pages_fetched: u64,

    /// Fetch attempts that failed (status, timeout, network, body)
    pub fetch_failures: u64,

    /// Fetched pages the parser rejected
    pub parse_failures: u64,

    /// Pages whose text matched an already-emitted page
    pub duplicates: u64,

    /// Records accepted by the output sink
    pub pages_emitted: u64,

    /// Records the output sink failed to write
    pub output_failures: u64,

    /// Links found on parsed pages (before deduplication)
    pub links_discovered: u64,

    /// New URLs added to the frontier
    pub links_enqueued: u64,

    /// Links dropped for being past the depth limit
    pub depth_limited: u64,

    /// Frontier entries dropped without a fetch (already fetched or domain cap)
    pub skipped: u64,
}

impl CrawlStatistics {
    /// Total fetch attempts, successful or not
    pub fn fetch_attempts(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// Terminal state (`Drained` or `Stopped`)
    pub state: CrawlState,

    pub stats: CrawlStatistics,

    /// Wall-clock duration of the crawl loop
    pub elapsed: Duration,
}

/// Prints a report to stdout in a formatted manner
pub fn print_statistics(report: &CrawlReport) {
    let stats = &report.stats;

    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Final state: {}", report.state);
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!("  Fetch attempts: {}", stats.fetch_attempts());
    println!("  Pages emitted: {}", stats.pages_emitted);
    println!();

    println!("Links:");
    println!("  Discovered: {}", stats.links_discovered);
    println!("  Enqueued: {}", stats.links_enqueued);
    println!("  Past depth limit: {}", stats.depth_limited);
    println!("  Skipped entries: {}", stats.skipped);
    println!();

    let failures = [
        ("Fetch failures", stats.fetch_failures),
        ("Parse failures", stats.parse_failures),
        ("Duplicate content", stats.duplicates),
        ("Output failures", stats.output_failures),
    ];
    if failures.iter().any(|(_, count)| *count > 0) {
        println!("Error Summary:");
        for (label, count) in failures.iter().filter(|(_, count)| *count > 0) {
            println!("  {}: {}", label, count);
        }
        println!();
    }

    let success_rate = if stats.fetch_attempts() > 0 {
        (stats.pages_emitted as f64 / stats.fetch_attempts() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} fetches emitted)",
        success_rate,
        stats.pages_emitted,
        stats.fetch_attempts()
    );
}
