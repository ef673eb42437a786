use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, ScoringConfig, SeedEntry, UserAgentConfig,
};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Upper bound accepted for `max-depth`
const MAX_DEPTH_LIMIT: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_scoring(&config.scoring)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

/// Validates crawler limits
pub fn validate_crawler(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.fetch_timeout_secs < 1 || config.fetch_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be between 1 and 300, got {}",
            config.fetch_timeout_secs
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_pages_per_domain == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages_per_domain must be >= 1 when set".to_string(),
        ));
    }

    // max_depth = 0 is valid and crawls the seeds only
    if let Some(depth) = config.max_depth {
        if depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Validation(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, depth
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the scoring rule tables
///
/// Weights may be negative (penalties) but must be finite. Only the
/// fairness retention is required to be non-negative.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), ConfigError> {
    if !config.priority_retention.is_finite() || config.priority_retention < 0.0 {
        return Err(ConfigError::Validation(format!(
            "priority_retention must be a finite value >= 0, got {}",
            config.priority_retention
        )));
    }

    if let Some(floor) = config.score_floor {
        if !floor.is_finite() {
            return Err(ConfigError::Validation(format!(
                "score_floor must be finite, got {}",
                floor
            )));
        }
    }

    for (domain, weight) in &config.priority_rules {
        validate_domain_pattern(domain)?;
        validate_weight("priority rule", domain, *weight)?;
    }

    let mut keywords = HashSet::new();
    for (keyword, weight) in &config.keyword_weights {
        if keyword.trim().is_empty() {
            return Err(ConfigError::Validation(
                "keyword cannot be empty".to_string(),
            ));
        }
        if !keywords.insert(keyword.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "keyword '{}' is listed more than once (keywords match case-insensitively)",
                keyword
            )));
        }
        validate_weight("keyword", keyword, *weight)?;
    }

    for (pattern, weight) in &config.content_type_weights {
        if pattern.is_empty() {
            return Err(ConfigError::Validation(
                "content type pattern cannot be empty".to_string(),
            ));
        }
        validate_weight("content type pattern", pattern, *weight)?;
    }

    Ok(())
}

fn validate_weight(kind: &str, key: &str, weight: f64) -> Result<(), ConfigError> {
    if !weight.is_finite() {
        return Err(ConfigError::Validation(format!(
            "{} '{}' has a non-finite weight: {}",
            kind, key, weight
        )));
    }
    Ok(())
}

/// Validates seed entries
fn validate_seeds(seeds: &[SeedEntry]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[seed]] entry is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(&seed.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS",
                seed.url
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed.url
            )));
        }

        if !seed.priority.is_finite() {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' has a non-finite priority",
                seed.url
            )));
        }
    }

    Ok(())
}

/// Validates a domain pattern (supports wildcards)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    match pattern.strip_prefix("*.") {
        Some(domain) => validate_domain_string(domain),
        None => validate_domain_string(pattern),
    }
}

/// Validates a domain string (without wildcard prefix)
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
