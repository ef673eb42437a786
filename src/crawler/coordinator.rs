//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the frontier, the visitation
//! tracker and the scoring engine to the fetch/parse/output collaborators:
//! - Seeding the frontier
//! - Pulling the best-scored URL, fetching and parsing it
//! - Scoring and enqueuing newly discovered links
//! - Handling stop requests and page budgets
//!
//! The loop is strictly sequential: each iteration awaits its fetch and
//! finishes parsing, scoring and inserting before the next one starts.

use crate::config::{
    validate_crawler, validate_scoring, Config, CrawlerConfig, ScoringConfig, SeedEntry,
};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::{HtmlParser, PageParser};
use crate::output::{
    CrawlReport, CrawlStatistics, JsonlSink, LogProgress, MemorySink, OutputSink, PageRecord,
    ProgressReporter,
};
use crate::scoring::score;
use crate::state::{CrawlState, VisitationTracker};
use crate::url::{extract_domain, normalize_url};
use crate::RippleError;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Cooperative cancellation flag for a running crawl
///
/// Clones share the same flag. The coordinator checks it at the top of every
/// iteration, so an in-flight fetch always completes first.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the crawl to stop before its next iteration
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<F: Fetcher> {
    crawler: CrawlerConfig,
    scoring: ScoringConfig,
    frontier: Frontier,
    tracker: VisitationTracker,
    fetcher: F,
    parser: Box<dyn PageParser>,
    sink: Box<dyn OutputSink>,
    progress: Box<dyn ProgressReporter>,
    state: CrawlState,
    stop: StopHandle,
    stats: CrawlStatistics,
    content_hashes: HashSet<String>,
}

impl<F: Fetcher> Coordinator<F> {
    /// Creates a new coordinator in the `Idle` state
    ///
    /// Seeds are normalized, marked seen and inserted with their own priority
    /// (they are not scored). A seed that normalizes to an earlier one is
    /// dropped with a warning.
    ///
    /// The coordinator starts with [`HtmlParser`], an in-memory sink and
    /// [`LogProgress`]; replace them with the `with_*` builders.
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(RippleError::Config)` - The crawler limits or scoring tables are invalid
    /// * `Err(RippleError)` - A seed URL could not be normalized
    pub fn new(
        crawler: CrawlerConfig,
        scoring: ScoringConfig,
        seeds: &[SeedEntry],
        fetcher: F,
    ) -> Result<Self, RippleError> {
        validate_crawler(&crawler)?;
        validate_scoring(&scoring)?;

        let mut tracker = VisitationTracker::new();
        let mut initial = Vec::with_capacity(seeds.len());

        for seed in seeds {
            let normalized = normalize_url(&seed.url)?;
            if !tracker.mark_seen(normalized.as_str()) {
                tracing::warn!("Dropping duplicate seed {}", seed.url);
                continue;
            }
            initial.push((seed.priority, String::from(normalized)));
        }

        tracing::info!("Seeding frontier with {} URLs", initial.len());

        Ok(Self {
            crawler,
            scoring,
            frontier: Frontier::from_seeds(initial),
            tracker,
            fetcher,
            parser: Box::new(HtmlParser),
            sink: Box::new(MemorySink::new()),
            progress: Box::new(LogProgress::default()),
            state: CrawlState::Idle,
            stop: StopHandle::new(),
            stats: CrawlStatistics::default(),
            content_hashes: HashSet::new(),
        })
    }

    /// Creates a coordinator from the crawler, scoring and seed sections of a config
    pub fn from_config(config: &Config, fetcher: F) -> Result<Self, RippleError> {
        Self::new(
            config.crawler.clone(),
            config.scoring.clone(),
            &config.seeds,
            fetcher,
        )
    }

    pub fn with_parser(mut self, parser: Box<dyn PageParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_output(mut self, sink: Box<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Uses an existing stop handle instead of the coordinator's own
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Returns a handle that stops this crawl when triggered
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn tracker(&self) -> &VisitationTracker {
        &self.tracker
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Runs the main crawl loop until the frontier drains or a stop applies
    ///
    /// Fetch, parse and output failures are logged and counted; they never
    /// end the crawl. Only defects surface as errors:
    ///
    /// * `RippleError::InvalidTransition` - `run` was called on a finished crawl
    /// * `RippleError::Invariant` - the frontier yielded an unusable URL
    pub async fn run(&mut self) -> Result<CrawlReport, RippleError> {
        self.transition(CrawlState::Running)?;

        let start_time = Instant::now();
        tracing::info!("Starting crawl with {} URLs in frontier", self.frontier.len());

        loop {
            if self.stop.is_stopped() {
                tracing::info!("Stop requested, ending crawl");
                self.transition(CrawlState::Stopped)?;
                break;
            }

            if let Some(max_pages) = self.crawler.max_pages {
                if self.stats.fetch_attempts() >= max_pages {
                    tracing::info!("Page budget of {} reached, ending crawl", max_pages);
                    self.transition(CrawlState::Stopped)?;
                    break;
                }
            }

            let entry = match self.frontier.extract_max() {
                Some(entry) => entry,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    self.transition(CrawlState::Drained)?;
                    break;
                }
            };

            self.process_entry(entry).await?;
        }

        if let Err(e) = self.sink.flush() {
            tracing::error!("Failed to flush output: {}", e);
            self.stats.output_failures += 1;
        }

        for (domain, visits) in self.tracker.domains() {
            tracing::debug!("Domain {}: {} visits", domain, visits);
        }

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl {}: {} fetches, {} pages emitted in {:?}",
            self.state,
            self.stats.fetch_attempts(),
            self.stats.pages_emitted,
            elapsed
        );

        Ok(self.report(elapsed))
    }

    fn report(&self, elapsed: Duration) -> CrawlReport {
        CrawlReport {
            state: self.state,
            stats: self.stats.clone(),
            elapsed,
        }
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), RippleError> {
        if !self.state.can_transition_to(next) {
            return Err(RippleError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Handles one frontier entry
    ///
    /// Every fetch attempt, successful or not, ends with one `record_visit`
    /// for the URL's domain. Every entry, skipped or not, ends with one
    /// progress notification.
    async fn process_entry(&mut self, entry: FrontierEntry) -> Result<(), RippleError> {
        let url = Url::parse(&entry.url).map_err(|e| {
            RippleError::Invariant(format!(
                "frontier entry {} is not a valid URL: {}",
                entry.url, e
            ))
        })?;
        let domain = extract_domain(&url).ok_or_else(|| {
            RippleError::Invariant(format!("frontier entry {} has no host", entry.url))
        })?;

        if self.tracker.is_fetched(url.as_str()) {
            tracing::debug!("Skipping already fetched {}", url);
            self.stats.skipped += 1;
        } else if self.domain_capped(&domain) {
            tracing::debug!("Skipping {}: {} reached its page cap", url, domain);
            self.stats.skipped += 1;
        } else {
            tracing::debug!(
                "Processing URL: {} (score {:.3}, depth {})",
                url,
                entry.score,
                entry.depth
            );
            self.tracker.mark_fetched(url.as_str());
            self.visit_page(&url, entry.depth).await;
            self.tracker.record_visit(&domain);
        }

        self.progress.report(url.as_str(), self.frontier.len());
        Ok(())
    }

    fn domain_capped(&self, domain: &str) -> bool {
        self.crawler
            .max_pages_per_domain
            .is_some_and(|cap| self.tracker.visit_count(domain) >= cap)
    }

    /// Fetches, parses, emits and expands a single page
    async fn visit_page(&mut self, url: &Url, depth: u32) {
        let raw = match self.fetcher.fetch(url).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.stats.fetch_failures += 1;
                return;
            }
        };
        self.stats.pages_fetched += 1;
        let fetched_at = Utc::now();
        self.mark_redirect_target(url, &raw.final_url);

        let parsed = match self.parser.parse(url, &raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Parse failed: {}", e);
                self.stats.parse_failures += 1;
                return;
            }
        };

        if self.crawler.dedupe_content {
            let digest = hex::encode(Sha256::digest(parsed.text.as_bytes()));
            if !self.content_hashes.insert(digest) {
                tracing::debug!("Duplicate content at {}", url);
                self.stats.duplicates += 1;
                return;
            }
        }

        let record = PageRecord {
            url: url.to_string(),
            score: score(
                url.as_str(),
                Some(parsed.text.as_str()),
                &self.tracker,
                &self.scoring,
            ),
            title: parsed.title,
            text: parsed.text,
            fetched_at,
        };
        match self.sink.emit(&record) {
            Ok(()) => self.stats.pages_emitted += 1,
            Err(e) => {
                tracing::error!("Failed to write {}: {}", url, e);
                self.stats.output_failures += 1;
            }
        }

        self.enqueue_links(&parsed.links, depth + 1);
    }

    /// Marks where a redirect ended up so links to it are not fetched again
    fn mark_redirect_target(&mut self, url: &Url, final_url: &str) {
        match normalize_url(final_url) {
            Ok(target) if target != *url => {
                tracing::debug!("{} redirected to {}", url, target);
                self.tracker.mark_seen(target.as_str());
                self.tracker.mark_fetched(target.as_str());
            }
            Ok(_) => {}
            Err(e) => tracing::debug!("Unusable final URL {}: {}", final_url, e),
        }
    }

    /// Scores and inserts every link that was not seen before
    ///
    /// Links past `max-depth` are dropped before scoring and are not marked
    /// seen, so a shorter path to the same URL can still enqueue it.
    fn enqueue_links(&mut self, links: &[String], depth: u32) {
        for link in links {
            self.stats.links_discovered += 1;

            if self.crawler.max_depth.is_some_and(|max| depth > max) {
                self.stats.depth_limited += 1;
                continue;
            }

            let normalized = match normalize_url(link) {
                Ok(n) => n,
                Err(e) => {
                    tracing::debug!("Failed to normalize URL {}: {}", link, e);
                    continue;
                }
            };

            if !self.tracker.mark_seen(normalized.as_str()) {
                continue;
            }

            let priority = score(normalized.as_str(), None, &self.tracker, &self.scoring);
            tracing::trace!("Enqueuing {} with score {:.3}", normalized, priority);
            self.frontier
                .insert_at_depth(priority, String::from(normalized), depth);
            self.stats.links_enqueued += 1;
        }
    }
}

/// Runs a complete crawl with the default collaborators
///
/// Fetches over HTTP with the configured user agent and timeout, and appends
/// records to `<output.directory>/crawl-<session>.jsonl`.
///
/// # Example
///
/// ```no_run
/// use ripple_rank::config::load_config;
/// use ripple_rank::crawler::{run_crawl, StopHandle};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let report = run_crawl(&config, "manual-run", StopHandle::new()).await?;
/// println!("{} pages emitted", report.stats.pages_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    session: &str,
    stop: StopHandle,
) -> Result<CrawlReport, RippleError> {
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.crawler.fetch_timeout_secs),
    )?;

    let mut coordinator = Coordinator::from_config(config, fetcher)?
        .with_output(Box::new(JsonlSink::for_session(
            &config.output.directory,
            session,
        )))
        .with_stop_handle(stop);

    coordinator.run().await
}
