//! Scoring engine for frontier prioritization
//!
//! Turns a URL (and, once fetched, its text) into a single priority by adding
//! five independent terms:
//!
//! | Term | Source | Needs content |
//! |------|--------|---------------|
//! | domain rule | longest matching suffix in `priority-rules` | no |
//! | keyword | occurrences of each keyword times its weight | yes |
//! | content type | every `content-type-weights` pattern found in the path | no |
//! | fairness | `priority-retention` decayed by prior visits to the domain | no |
//! | depth | minus the number of path separators | no |
//!
//! The sum is not normalized, so the relative magnitude of the tables
//! controls their influence. The engine holds no state: the same URL,
//! content, visit snapshot and config always produce the same score.

mod fairness;

pub use fairness::fairness_bonus;

use crate::config::ScoringConfig;
use crate::state::VisitationTracker;
use crate::url::{extract_domain, longest_suffix_match, normalize_url, path_depth, raw_path};
use url::Url;

/// Per-term contributions to a score
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Domain the domain-dependent terms were computed for, if the URL parsed
    pub domain: Option<String>,
    /// Rule key that matched, if any
    pub matched_rule: Option<String>,
    pub domain_rule: f64,
    pub keyword: f64,
    pub content_type: f64,
    pub fairness: f64,
    pub depth_penalty: f64,
    /// Raw sum of the five terms
    pub raw_total: f64,
    /// `raw_total` after the optional floor
    pub total: f64,
}

/// Computes the priority of a URL
///
/// Pass `content: None` at discovery time; the keyword term is then 0.
///
/// # Example
///
/// ```
/// use ripple_rank::config::ScoringConfig;
/// use ripple_rank::scoring::score;
/// use ripple_rank::state::VisitationTracker;
///
/// let mut config = ScoringConfig::default();
/// config.priority_rules.insert("a.com".to_string(), 10.0);
/// config.keyword_weights.insert("x".to_string(), 5.0);
///
/// let tracker = VisitationTracker::new();
/// assert_eq!(score("https://a.com/x/y", None, &tracker, &config), 8.0);
/// ```
pub fn score(
    url: &str,
    content: Option<&str>,
    tracker: &VisitationTracker,
    config: &ScoringConfig,
) -> f64 {
    score_breakdown(url, content, tracker, config).total
}

/// Computes the priority of a URL and reports each term separately
pub fn score_breakdown(
    url: &str,
    content: Option<&str>,
    tracker: &VisitationTracker,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let parsed = Url::parse(url.trim()).ok();
    let domain = parsed.as_ref().and_then(extract_domain);
    let path = match &parsed {
        Some(u) if domain.is_some() => u.path(),
        _ => raw_path(url),
    };

    let mut breakdown = ScoreBreakdown {
        domain: domain.clone(),
        ..Default::default()
    };

    if let Some(domain) = &domain {
        if let Some((rule, weight)) = longest_suffix_match(domain, &config.priority_rules) {
            breakdown.matched_rule = Some(rule.to_string());
            breakdown.domain_rule = weight;
        }
        breakdown.fairness = fairness_bonus(
            config.fairness,
            config.priority_retention,
            tracker.visit_count(domain),
        );
    }

    breakdown.keyword = content
        .map(|text| keyword_term(text, config))
        .unwrap_or(0.0);
    breakdown.content_type = content_type_term(path, config);
    breakdown.depth_penalty = -f64::from(path_depth(path));

    breakdown.raw_total = breakdown.domain_rule
        + breakdown.keyword
        + breakdown.content_type
        + breakdown.fairness
        + breakdown.depth_penalty;
    breakdown.total = match config.score_floor {
        Some(floor) => breakdown.raw_total.max(floor),
        None => breakdown.raw_total,
    };

    breakdown
}

/// Scores a URL the way it would be scored when first discovered
///
/// The URL is normalized first, as the crawler does before scoring a link.
/// A URL that does not normalize is scored as given.
pub fn discovery_breakdown(url: &str, config: &ScoringConfig) -> ScoreBreakdown {
    let url = normalize_url(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string());
    score_breakdown(&url, None, &VisitationTracker::new(), config)
}

/// Sums `occurrences * weight` over the keyword table
fn keyword_term(content: &str, config: &ScoringConfig) -> f64 {
    if config.keyword_weights.is_empty() {
        return 0.0;
    }

    let haystack = content.to_lowercase();
    config
        .keyword_weights
        .iter()
        .filter(|(keyword, _)| !keyword.is_empty())
        .map(|(keyword, weight)| {
            let count = haystack.matches(keyword.to_lowercase().as_str()).count();
            count as f64 * weight
        })
        .sum()
}

/// Adds the weight of every pattern found in the path
fn content_type_term(path: &str, config: &ScoringConfig) -> f64 {
    if config.content_type_weights.is_empty() {
        return 0.0;
    }

    let path = path.to_lowercase();
    config
        .content_type_weights
        .iter()
        .filter(|(pattern, _)| !pattern.is_empty() && path.contains(&pattern.to_lowercase()))
        .map(|(_, weight)| *weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FairnessCurve;
    use std::collections::BTreeMap;

    fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    fn scenario_config() -> ScoringConfig {
        ScoringConfig {
            priority_rules: table(&[("a.com", 10.0)]),
            keyword_weights: table(&[("x", 5.0)]),
            ..Default::default()
        }
    }

    #[test]
    fn test_discovery_scenario() {
        let tracker = VisitationTracker::new();
        let breakdown = score_breakdown("https://a.com/x/y", None, &tracker, &scenario_config());

        assert_eq!(breakdown.domain_rule, 10.0);
        assert_eq!(breakdown.keyword, 0.0);
        assert_eq!(breakdown.content_type, 0.0);
        assert_eq!(breakdown.fairness, 0.0);
        assert_eq!(breakdown.depth_penalty, -2.0);
        assert_eq!(breakdown.total, 8.0);
    }

    #[test]
    fn test_longest_suffix_rule_applies() {
        let config = ScoringConfig {
            priority_rules: table(&[("medium.com", 1.0), ("blog.medium.com", 10.0)]),
            ..Default::default()
        };
        let tracker = VisitationTracker::new();

        let breakdown = score_breakdown("https://blog.medium.com/x", None, &tracker, &config);
        assert_eq!(breakdown.domain_rule, 10.0);
        assert_eq!(breakdown.matched_rule.as_deref(), Some("blog.medium.com"));
        assert_eq!(breakdown.total, 9.0);

        let other = score_breakdown("https://news.medium.com/x", None, &tracker, &config);
        assert_eq!(other.domain_rule, 1.0);
    }

    #[test]
    fn test_keyword_counts_case_insensitive_occurrences() {
        let config = ScoringConfig {
            keyword_weights: table(&[("rust", 2.0), ("Async", 0.5)]),
            ..Default::default()
        };
        let tracker = VisitationTracker::new();

        let content = "Rust is fun. RUST is fast. async rust with ASYNC runtimes.";
        let breakdown = score_breakdown("https://example.com/", Some(content), &tracker, &config);
        assert_eq!(breakdown.keyword, 3.0 * 2.0 + 2.0 * 0.5);
    }

    #[test]
    fn test_keyword_ignored_without_content() {
        let config = ScoringConfig {
            keyword_weights: table(&[("rust", 2.0)]),
            ..Default::default()
        };
        let tracker = VisitationTracker::new();
        let breakdown = score_breakdown("https://example.com/rust", None, &tracker, &config);
        assert_eq!(breakdown.keyword, 0.0);
    }

    #[test]
    fn test_content_type_patterns_are_independent() {
        let config = ScoringConfig {
            content_type_weights: table(&[
                ("/article/", 3.0),
                ("/tutorial-", 2.0),
                ("/video/", 7.0),
            ]),
            ..Default::default()
        };
        let tracker = VisitationTracker::new();

        let breakdown = score_breakdown(
            "https://example.com/Article/tutorial-rust",
            None,
            &tracker,
            &config,
        );
        assert_eq!(breakdown.content_type, 5.0);
        assert_eq!(breakdown.depth_penalty, -2.0);
    }

    #[test]
    fn test_content_type_ignores_host_and_query() {
        let config = ScoringConfig {
            content_type_weights: table(&[("article", 3.0)]),
            ..Default::default()
        };
        let tracker = VisitationTracker::new();
        let breakdown = score_breakdown(
            "https://article.example.com/home?tag=article",
            None,
            &tracker,
            &config,
        );
        assert_eq!(breakdown.content_type, 0.0);
    }

    #[test]
    fn test_fairness_decays_with_visits() {
        let config = ScoringConfig {
            priority_retention: 6.0,
            ..Default::default()
        };
        let mut tracker = VisitationTracker::new();

        assert_eq!(score("https://example.com/", None, &tracker, &config), 6.0);
        tracker.record_visit("example.com");
        assert_eq!(score("https://example.com/", None, &tracker, &config), 3.0);
        tracker.record_visit("example.com");
        assert_eq!(score("https://example.com/", None, &tracker, &config), 2.0);
        assert_eq!(score("https://fresh.com/", None, &tracker, &config), 6.0);
    }

    #[test]
    fn test_stepped_fairness() {
        let config = ScoringConfig {
            priority_retention: 3.0,
            fairness: FairnessCurve::Stepped,
            ..Default::default()
        };
        let mut tracker = VisitationTracker::new();
        assert_eq!(score("https://example.com/", None, &tracker, &config), 3.0);
        tracker.record_visit("example.com");
        assert_eq!(score("https://example.com/", None, &tracker, &config), 1.0);
        for _ in 0..4 {
            tracker.record_visit("example.com");
        }
        assert_eq!(score("https://example.com/", None, &tracker, &config), 0.0);
    }

    #[test]
    fn test_malformed_url_skips_domain_terms() {
        let config = ScoringConfig {
            priority_rules: table(&[("a.com", 10.0)]),
            content_type_weights: table(&[("/article/", 3.0)]),
            priority_retention: 4.0,
            ..Default::default()
        };
        let tracker = VisitationTracker::new();

        let breakdown = score_breakdown("https://a .com/article/x", None, &tracker, &config);
        assert_eq!(breakdown.domain, None);
        assert_eq!(breakdown.domain_rule, 0.0);
        assert_eq!(breakdown.fairness, 0.0);
        assert_eq!(breakdown.content_type, 3.0);
        assert_eq!(breakdown.depth_penalty, -2.0);
        assert_eq!(breakdown.total, 1.0);
    }

    #[test]
    fn test_empty_tables_contribute_nothing() {
        let tracker = VisitationTracker::new();
        let config = ScoringConfig::default();
        assert_eq!(
            score("https://example.com/", Some("anything"), &tracker, &config),
            0.0
        );
    }

    #[test]
    fn test_score_floor() {
        let config = ScoringConfig {
            score_floor: Some(0.0),
            ..Default::default()
        };
        let tracker = VisitationTracker::new();
        let breakdown = score_breakdown("https://example.com/a/b/c", None, &tracker, &config);
        assert_eq!(breakdown.raw_total, -3.0);
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let config = ScoringConfig {
            priority_rules: table(&[("example.com", 1.25), ("docs.example.com", 2.5)]),
            keyword_weights: table(&[("alpha", 0.1), ("beta", 0.2), ("gamma", 0.3)]),
            content_type_weights: table(&[("/guide", 0.7), ("/v2/", 0.11)]),
            priority_retention: 1.0 / 3.0,
            ..Default::default()
        };
        let mut tracker = VisitationTracker::new();
        tracker.record_visit("docs.example.com");

        let url = "https://docs.example.com/v2/guide/intro";
        let text = "alpha beta gamma beta gamma gamma";
        let first = score(url, Some(text), &tracker, &config);
        for _ in 0..50 {
            assert_eq!(
                score(url, Some(text), &tracker, &config).to_bits(),
                first.to_bits()
            );
        }
    }

    #[test]
    fn test_discovery_breakdown_normalizes() {
        let config = ScoringConfig::default();
        let breakdown = discovery_breakdown("https://A.com//x/./y", &config);
        assert_eq!(breakdown.domain.as_deref(), Some("a.com"));
        assert_eq!(breakdown.depth_penalty, -2.0);
        assert_eq!(
            breakdown,
            score_breakdown("https://a.com/x/y", None, &VisitationTracker::new(), &config)
        );
    }

    #[test]
    fn test_discovery_breakdown_unnormalizable_falls_back() {
        let config = ScoringConfig::default();
        let breakdown = discovery_breakdown("ftp://a.com/x", &config);
        assert_eq!(
            breakdown,
            score_breakdown("ftp://a.com/x", None, &VisitationTracker::new(), &config)
        );
    }
}
