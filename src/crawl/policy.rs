// src/crawl/policy.rs
// =============================================================================
// Access policy: which URLs the crawler is allowed to visit.
//
// Two independent allow-lists:
// - hosts: exact host (or host:port) names. Empty = every host is allowed.
// - URL patterns: regular expressions matched against the full URL string.
//   Empty = every URL is allowed.
// A URL must pass both lists.
//
// The policy is built before crawling starts and is read-only afterwards.
// The crawler only hands out &AccessPolicy while a crawl is running, so the
// borrow checker enforces that nobody edits it mid-crawl.
// =============================================================================

use regex::Regex;
use std::collections::HashSet;
use url::Url;

use super::resolver::authority;

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    allowed_hosts: HashSet<String>,
    allowed_url_patterns: Vec<Regex>,
}

impl AccessPolicy {
    /// A policy with no restrictions at all.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Adds hosts to the allow-list.
    ///
    /// Entries are compared with the URL's authority, so include the port
    /// when crawling a server on a non-default port ("127.0.0.1:8080").
    pub fn add_allowed_hosts<I, S>(&mut self, hosts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_hosts
            .extend(hosts.into_iter().map(Into::<String>::into).filter(|h| !h.is_empty()));
    }

    /// Adds a regular expression that allowed URLs must match.
    pub fn add_allowed_url_pattern(&mut self, pattern: &str) -> Result<(), regex::Error> {
        self.allowed_url_patterns.push(Regex::new(pattern)?);
        Ok(())
    }

    pub fn is_allowed(&self, url: &Url) -> bool {
        self.is_allowed_host(&authority(url)) && self.matches_url_pattern(url.as_str())
    }

    fn is_allowed_host(&self, host: &str) -> bool {
        self.allowed_hosts.is_empty() || self.allowed_hosts.contains(host)
    }

    fn matches_url_pattern(&self, url: &str) -> bool {
        self.allowed_url_patterns.is_empty()
            || self.allowed_url_patterns.iter().any(|re| re.is_match(url))
    }
}
