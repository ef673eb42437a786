//! Ripple-Rank: a prioritized web crawler
//!
//! This crate implements a crawler that always fetches the most promising
//! known URL next. Discovered links are scored from domain rules, keyword
//! relevance, URL path hints, per-domain fairness and path depth, then pushed
//! into a max-priority frontier.

pub mod config;
pub mod crawler;
pub mod output;
pub mod scoring;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Rank operations
///
/// Only defects and setup failures surface here. Per-page failures (fetch,
/// parse, output) are recorded by the coordinator and never abort a crawl.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("Crawl invariant violated: {0}")]
    Invariant(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Ripple-Rank operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Frontier, FrontierEntry, StopHandle};
pub use scoring::{score, score_breakdown, ScoreBreakdown};
pub use state::{CrawlState, VisitationTracker};
pub use crate::url::{extract_domain, normalize_url};
