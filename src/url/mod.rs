//! URL handling module for Ripple-Rank
//!
//! This module provides URL normalization, domain extraction, path depth
//! measurement and domain-suffix rule matching.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::{domain_of, extract_domain, path_depth, raw_path};
pub use matcher::{longest_suffix_match, matches_domain_suffix};
pub use normalize::normalize_url;
