use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Ripple-Rank
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default, rename = "seed")]
    pub seeds: Vec<SeedEntry>,
}

/// Crawl loop limits
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seconds before a fetch is abandoned and counted as a failure
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Stop after this many fetch attempts
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,

    /// Skip URLs on a domain once it has been attempted this many times
    #[serde(rename = "max-pages-per-domain", default)]
    pub max_pages_per_domain: Option<u64>,

    /// Do not enqueue links more than this many hops from a seed
    #[serde(rename = "max-depth", default)]
    pub max_depth: Option<u32>,

    /// Drop pages whose extracted text was already emitted
    #[serde(rename = "dedupe-content", default)]
    pub dedupe_content: bool,
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
            max_pages: None,
            max_pages_per_domain: None,
            max_depth: None,
            dedupe_content: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one JSON-lines file per crawl session
    pub directory: String,
}

/// How the visitation-fairness term decays with prior visits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FairnessCurve {
    /// `retention / (1 + visits)`
    #[default]
    Decaying,
    /// Full retention for unvisited domains, a third below five visits, then nothing
    Stepped,
}

/// Rule tables used by the scoring engine
///
/// Ordered maps keep term summation in a fixed order, so equal inputs always
/// produce bit-identical scores.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringConfig {
    /// Domain suffix -> bonus; the most specific matching suffix applies
    #[serde(rename = "priority-rules", default)]
    pub priority_rules: BTreeMap<String, f64>,

    /// Keyword -> weight per case-insensitive occurrence in page text
    #[serde(rename = "keyword-weights", default)]
    pub keyword_weights: BTreeMap<String, f64>,

    /// URL path substring -> bonus, each pattern applied independently
    #[serde(rename = "content-type-weights", default)]
    pub content_type_weights: BTreeMap<String, f64>,

    /// Fairness bonus granted to a domain that has never been visited
    #[serde(rename = "priority-retention", default)]
    pub priority_retention: f64,

    #[serde(default)]
    pub fairness: FairnessCurve,

    /// Lower bound applied to the final score
    #[serde(rename = "score-floor", default)]
    pub score_floor: Option<f64>,
}

/// A seed URL with a caller-chosen starting priority
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub url: String,

    #[serde(default)]
    pub priority: f64,
}
