/// Checks whether a host falls under a domain rule
///
/// A rule matches its own domain and every subdomain of it, at label
/// boundaries only. A leading `*.` on the rule is accepted and means the same
/// thing. Comparison is ASCII case-insensitive.
///
/// # Examples
///
/// ```
/// use ripple_rank::url::matches_domain_suffix;
///
/// assert!(matches_domain_suffix("example.com", "example.com"));
/// assert!(matches_domain_suffix("example.com", "blog.example.com"));
/// assert!(matches_domain_suffix("*.example.com", "api.v2.example.com"));
/// assert!(!matches_domain_suffix("example.com", "myexample.com"));
/// ```
pub fn matches_domain_suffix(rule: &str, host: &str) -> bool {
    let base = rule_base(rule);
    if base.is_empty() || host.len() < base.len() {
        return false;
    }

    let split = host.len() - base.len();
    match (host.get(..split), host.get(split..)) {
        (Some(prefix), Some(tail)) => {
            tail.eq_ignore_ascii_case(base) && (prefix.is_empty() || prefix.ends_with('.'))
        }
        _ => false,
    }
}

/// Finds the most specific rule that matches a host
///
/// Specificity is the length of the rule's domain without any `*.` prefix,
/// so `blog.medium.com` beats `medium.com` for `blog.medium.com`. On equal
/// length the first rule in iteration order wins.
pub fn longest_suffix_match<'a, I>(host: &str, rules: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    let mut best: Option<(&'a str, f64)> = None;

    for (rule, weight) in rules {
        if !matches_domain_suffix(rule, host) {
            continue;
        }
        let longer = match best {
            Some((current, _)) => rule_base(rule).len() > rule_base(current).len(),
            None => true,
        };
        if longer {
            best = Some((rule.as_str(), *weight));
        }
    }

    best
}

fn rule_base(rule: &str) -> &str {
    rule.strip_prefix("*.").unwrap_or(rule)
}
