use crate::url::normalize_url;
use std::collections::{HashMap, HashSet};

/// Tracks which URLs have been seen and how often each domain was visited
///
/// `seen` holds every URL that was ever inserted into the frontier, so a URL
/// is scored and enqueued at most once. `fetched` holds URLs whose fetch was
/// attempted. Visit counts move only on fetch attempts, never on discovery.
///
/// Every membership check goes through [`normalize_url`], so `HTTPS://A.com/x/`
/// and `https://a.com/x#top` share one entry.
#[derive(Debug, Default)]
pub struct VisitationTracker {
    visit_counts: HashMap<String, u64>,
    seen: HashSet<String>,
    fetched: HashSet<String>,
}

impl VisitationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as seen
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not seen before and may be enqueued
    /// * `false` - The URL (or an equivalent spelling) was already seen
    pub fn mark_seen(&mut self, url: &str) -> bool {
        self.seen.insert(seen_key(url))
    }

    /// Returns whether a URL (or an equivalent spelling) was already seen
    pub fn is_seen(&self, url: &str) -> bool {
        self.seen.contains(&seen_key(url))
    }

    /// Marks a URL as fetched; returns false if it was already fetched
    pub fn mark_fetched(&mut self, url: &str) -> bool {
        self.fetched.insert(seen_key(url))
    }

    pub fn is_fetched(&self, url: &str) -> bool {
        self.fetched.contains(&seen_key(url))
    }

    /// Records one fetch attempt against a domain
    pub fn record_visit(&mut self, domain: &str) {
        *self
            .visit_counts
            .entry(domain.to_lowercase())
            .or_insert(0) += 1;
    }

    /// Number of fetch attempts recorded for a domain
    pub fn visit_count(&self, domain: &str) -> u64 {
        self.visit_counts
            .get(&domain.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct URLs seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Number of distinct URLs whose fetch was attempted
    pub fn fetched_count(&self) -> usize {
        self.fetched.len()
    }

    /// Iterates over `(domain, visits)` pairs in no particular order
    pub fn domains(&self) -> impl Iterator<Item = (&str, u64)> {
        self.visit_counts.iter().map(|(d, c)| (d.as_str(), *c))
    }
}

/// Canonical key for membership checks
///
/// URLs that fail normalization still get a stable key so that repeated
/// garbage links are not processed twice.
fn seen_key(url: &str) -> String {
    match normalize_url(url) {
        Ok(normalized) => normalized.into(),
        Err(_) => url.trim().to_lowercase(),
    }
}
