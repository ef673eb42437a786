//! HTML parser for extracting text, links and metadata
//!
//! This module handles parsing fetched content to extract:
//! - Visible text (scored for keywords and written to the output sink)
//! - Links to follow (from <a> tags and canonical links)
//! - Page title

use crate::crawler::fetcher::RawContent;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Elements whose text is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from a page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Visible text, whitespace-collapsed
    pub text: String,

    /// All links found on the page (absolute URLs)
    pub links: Vec<String>,
}

/// Reasons a page cannot be parsed
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported content type for {url}: {content_type}")]
    UnsupportedContentType { url: String, content_type: String },

    #[error("Empty document at {url}")]
    EmptyDocument { url: String },
}

/// Turns raw fetched content into text and candidate links
///
/// Supply a custom implementation to the coordinator with
/// [`Coordinator::with_parser`](crate::crawler::Coordinator::with_parser).
pub trait PageParser: Send {
    fn parse(&self, url: &Url, raw: &RawContent) -> Result<ParsedPage, ParseError>;
}

/// Default [`PageParser`] for HTML and plain text responses
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl PageParser for HtmlParser {
    fn parse(&self, url: &Url, raw: &RawContent) -> Result<ParsedPage, ParseError> {
        if let Some(content_type) = &raw.content_type {
            if !is_textual(content_type) {
                return Err(ParseError::UnsupportedContentType {
                    url: url.to_string(),
                    content_type: content_type.clone(),
                });
            }
        }

        if raw.body.trim().is_empty() {
            return Err(ParseError::EmptyDocument {
                url: url.to_string(),
            });
        }

        // Relative links resolve against where the redirects ended up
        let base = Url::parse(&raw.final_url).unwrap_or_else(|_| url.clone());
        Ok(parse_html(&raw.body, &base))
    }
}

fn is_textual(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("html") || content_type.starts_with("text/")
}

/// Parses HTML content and extracts text, links and metadata
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs and fragment-only anchors
///
/// # Example
///
/// ```
/// use ripple_rank::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><p>Hello</p><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.text, "Hello Link");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects visible text from the body (or the whole document if there is none)
fn extract_text(document: &Html) -> String {
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ElementRef::wrap(ancestor)
                .map(|element| HIDDEN_ELEMENTS.contains(&element.value().name()))
                .unwrap_or(false)
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
