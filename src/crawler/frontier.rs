//! Frontier priority queue
//!
//! A binary max-heap of `(score, url)` entries. Equal scores are served in
//! insertion order, using a monotonically increasing sequence number as the
//! secondary key, so a crawl over the same inputs always visits pages in the
//! same order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A URL waiting in the frontier
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// Priority (higher is fetched first)
    pub score: f64,

    /// Normalized URL
    pub url: String,

    /// Link hops from the nearest seed (seeds are 0)
    pub depth: u32,

    /// Insertion sequence number
    pub seq: u64,
}

// Higher score first; among equal scores the lower sequence number (older
// entry) compares greater so BinaryHeap pops it first.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Max-priority queue of discovered but not yet fetched URLs
///
/// The frontier never deduplicates; callers consult the
/// [`VisitationTracker`](crate::state::VisitationTracker) before inserting.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a frontier from an ordered list of `(priority, url)` pairs
    ///
    /// Seeds keep their list order as the tie-break among equal priorities.
    pub fn from_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        let mut frontier = Self::new();
        for (priority, url) in seeds {
            frontier.insert(priority, url);
        }
        frontier
    }

    /// Adds an entry at depth 0 unconditionally. O(log n).
    pub fn insert(&mut self, score: f64, url: impl Into<String>) {
        self.insert_at_depth(score, url, 0);
    }

    /// Adds an entry discovered `depth` hops from a seed. O(log n).
    pub fn insert_at_depth(&mut self, score: f64, url: impl Into<String>, depth: u32) {
        // total_cmp orders -0.0 below 0.0; fold them so they tie FIFO
        let score = if score == 0.0 { 0.0 } else { score };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(FrontierEntry {
            score,
            url: url.into(),
            depth,
            seq,
        });
    }

    /// Removes and returns the highest-priority entry. O(log n).
    ///
    /// Returns `None` when the frontier is exhausted, which is the normal end
    /// of a crawl rather than an error.
    pub fn extract_max(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    /// Score of the entry `extract_max` would return next
    pub fn peek_score(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.score)
    }

    /// Returns the number of URLs in the frontier
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
