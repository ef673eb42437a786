//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The score-ordered frontier
//! - HTTP fetching with a hard timeout
//! - HTML parsing, text and link extraction
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator, StopHandle};
pub use fetcher::{build_http_client, fetch_url, FetchError, Fetcher, HttpFetcher, RawContent};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{parse_html, HtmlParser, PageParser, ParseError, ParsedPage};
