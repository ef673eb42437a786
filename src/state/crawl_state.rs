//! Crawl controller lifecycle states
//!
//! A crawl moves `Idle -> Running` once and then ends in exactly one of the
//! terminal states.

use serde::Serialize;
use std::fmt;

/// Represents the current state of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlState {
    /// Constructed, seeds loaded, loop not started
    Idle,

    /// Loop is pulling entries from the frontier
    Running,

    // ===== Terminal States =====
    /// The frontier ran out of entries
    Drained,

    /// A stop was requested or a page budget was exhausted
    Stopped,
}

impl CrawlState {
    /// Returns true if the crawl has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Drained | Self::Stopped)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Drained)
                | (Self::Running, Self::Stopped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Drained => "drained",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
