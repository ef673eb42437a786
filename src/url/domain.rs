use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_rank::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Parses a URL string and returns its lowercase host, if any
pub fn domain_of(url_str: &str) -> Option<String> {
    Url::parse(url_str.trim())
        .ok()
        .and_then(|url| extract_domain(&url))
}

/// Counts path separators beyond the host, ignoring a trailing slash
///
/// `/` is depth 0, `/x` is 1, `/x/y` and `/x/y/` are both 2.
pub fn path_depth(path: &str) -> u32 {
    path.trim_end_matches('/').matches('/').count() as u32
}

/// Best-effort path of a URL string that could not be parsed
///
/// Strips an optional `scheme://` and authority, then drops any query or
/// fragment. Returns an empty string when nothing path-like remains.
pub fn raw_path(url_str: &str) -> &str {
    let trimmed = url_str.trim();
    let after_authority = match trimmed.find("://") {
        Some(idx) => Some(&trimmed[idx + 3..]),
        None => trimmed.strip_prefix("//"),
    };

    let path = match after_authority {
        Some(rest) => rest.find('/').map_or("", |idx| &rest[idx..]),
        None if trimmed.starts_with('/') => trimmed,
        None => "",
    };

    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}
