// src/crawl/resolver.rs
// =============================================================================
// URL helpers used by the crawl engine.
//
// Three jobs:
// - resolve: turn an href found on a page into an absolute URL
// - canonicalize: reduce a URL to scheme://host/path for duplicate detection
// - is_valid: only http(s) URLs with a host are worth fetching
//
// Rust concepts:
// - Option<T>: "no link here" is None instead of an empty string
// - Borrowing: every helper takes &Url / &str, nothing is copied needlessly
// =============================================================================

use url::Url;

// Resolves a raw href against the page it was found on
//
// Parameters:
//   base: URL of the page containing the link
//   raw: the href exactly as it appeared in the document
//
// Returns: Some(absolute_url) or None when the link should be dropped
//
// Examples (base = "http://h/x/y"):
//   "/a/b"            -> Some("http://h/a/b")
//   "c/d"             -> Some("http://h/x/c/d")
//   "https://other/z" -> Some("https://other/z")  (returned unchanged)
//   "#top", "?page=2" -> None (no path to follow)
//   "//cdn.h/lib.js"  -> None (scheme-relative links are not followed)
pub fn resolve(base: &Url, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Absolute links already carry a scheme, keep them exactly as written
    match Url::parse(raw) {
        Ok(_) => return Some(raw.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(_) => return None,
    }

    if raw.starts_with("//") {
        return None;
    }

    // Everything before '?' or '#' is the path part of the reference
    let path = raw.split(['?', '#']).next().unwrap_or("");
    if path.is_empty() {
        return None;
    }

    // Url::join follows RFC 3986: "/a" replaces the base path,
    // "a" replaces only the last segment of it
    base.join(raw).ok().map(String::from)
}

// Reduces a URL to the form used for "have we seen this page?" checks
//
// scheme + "://" + host[:port] + path, with query, fragment and any
// trailing slashes removed. The URL that actually gets fetched keeps
// its query and fragment; this string is only a dedup key.
pub fn canonicalize(url: &Url) -> String {
    let canonical = format!("{}://{}{}", url.scheme(), authority(url), url.path());
    canonical.trim_end_matches('/').to_string()
}

// host, or host:port when the URL names a non-default port
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

// A URL can be crawled only if it is http(s) and names a host
pub fn is_valid(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}
