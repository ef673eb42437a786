//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of the crawl controller (idle, running, drained, stopped)
//! - `VisitationTracker`: per-domain visit counts and the set of already seen URLs

mod crawl_state;
mod visitation;

// Re-export main types
pub use crawl_state::CrawlState;
pub use visitation::VisitationTracker;
