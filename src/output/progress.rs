//! Progress reporting through `tracing`

use crate::output::traits::ProgressReporter;

/// Pages between info-level progress lines
const DEFAULT_INFO_INTERVAL: u64 = 25;

/// Default [`ProgressReporter`]: one debug line per page and an info line
/// every `interval` pages
#[derive(Debug, Clone)]
pub struct LogProgress {
    interval: u64,
    processed: u64,
}

impl LogProgress {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            processed: 0,
        }
    }

    /// Number of iterations reported so far
    pub fn processed(&self) -> u64 {
        self.processed
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(DEFAULT_INFO_INTERVAL)
    }
}

impl ProgressReporter for LogProgress {
    fn report(&mut self, current_url: &str, frontier_size: usize) {
        self.processed += 1;
        tracing::debug!(
            url = current_url,
            frontier = frontier_size,
            "Processed page {}",
            self.processed
        );

        if self.processed % self.interval == 0 {
            tracing::info!(
                "Progress: {} pages processed, {} URLs in frontier",
                self.processed,
                frontier_size
            );
        }
    }
}

/// Reporter that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _current_url: &str, _frontier_size: usize) {}
}
