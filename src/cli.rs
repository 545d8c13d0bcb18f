// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every flag can also be set through an environment variable with the same
// name in UPPER_SNAKE_CASE (--depth -> DEPTH, --allowed-hosts -> ALLOWED_HOSTS).
// A flag given on the command line wins over the environment.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates all the parsing code
// - Option<T>: flags that may be absent
// - Vec<T>: flags that can hold several values
// =============================================================================

use clap::builder::{BoolishValueParser, RangedU64ValueParser};
use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::crawl::DEFAULT_PARALLELISM;
use crate::fetcher::DEFAULT_TIMEOUT;

#[derive(Parser, Debug)]
#[command(
    name = "site-walker",
    version,
    about = "Crawl a website from a seed URL, following links up to a given depth",
    long_about = "site-walker follows links from a seed page, fetching every distinct page at \
                  most once, optionally restricted to a set of hosts or URL patterns. \
                  Fetched pages can be saved to an output directory."
)]
pub struct Cli {
    /// Site to crawl (the seed URL, http or https)
    ///
    /// Example: --site https://example.com
    #[arg(long, env = "SITE", value_parser = parse_site)]
    pub site: String,

    /// How many link hops to follow
    ///
    /// Depth 1 = just the seed page
    /// Depth 2 = the seed page + every page it links to
    /// etc.
    #[arg(
        long,
        env = "DEPTH",
        default_value_t = 1,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub depth: usize,

    /// Maximum number of pages fetched at the same time
    #[arg(
        long,
        env = "PARALLELISM",
        default_value_t = DEFAULT_PARALLELISM,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub parallelism: usize,

    /// Hosts the crawler may visit, comma separated (default: any host)
    ///
    /// Include the port for non-default ports: 127.0.0.1:8080
    #[arg(long, env = "ALLOWED_HOSTS", value_delimiter = ',')]
    pub allowed_hosts: Vec<String>,

    /// Regular expression visited URLs must match (repeatable)
    ///
    /// The ALLOWED_URL_PATTERN environment variable holds a single pattern;
    /// pass the flag several times for more than one.
    #[arg(long = "allowed-url-pattern", env = "ALLOWED_URL_PATTERN")]
    pub allowed_url_patterns: Vec<String>,

    /// Render pages with headless Chrome instead of a plain HTTP GET
    ///
    /// HEADLESS_CHROME accepts 1/0, true/false, yes/no, on/off
    #[arg(long, env = "HEADLESS_CHROME", value_parser = BoolishValueParser::new())]
    pub headless_chrome: bool,

    /// Directory for saving fetched pages (nothing is saved when omitted)
    #[arg(long, env = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

// The seed must be an absolute http(s) URL with a host; anything else is a
// usage error (exit code 2), not an empty crawl.
fn parse_site(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|e| format!("not a valid URL: {}", e))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}', expected http or https", other)),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("URL has no host".to_string());
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["site-walker", "--site", "https://example.com"]).unwrap();
        assert_eq!(cli.site, "https://example.com");
        assert_eq!(cli.depth, 1);
        assert_eq!(cli.parallelism, DEFAULT_PARALLELISM);
        assert!(cli.allowed_hosts.is_empty());
        assert!(cli.allowed_url_patterns.is_empty());
        assert!(cli.output_dir.is_none());
    }

    #[test]
    fn test_lists() {
        let cli = Cli::try_parse_from([
            "site-walker",
            "--site",
            "https://example.com",
            "--allowed-hosts",
            "example.com,docs.example.com",
            "--allowed-url-pattern",
            "/docs/",
            "--allowed-url-pattern",
            r"\.html$",
            "--depth",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.allowed_hosts, vec!["example.com", "docs.example.com"]);
        assert_eq!(cli.allowed_url_patterns, vec!["/docs/", r"\.html$"]);
        assert_eq!(cli.depth, 3);
    }

    #[test]
    fn test_site_must_be_http_url() {
        for site in ["ftp://example.com", "mailto:a@example.com", "not a url", "/relative"] {
            let result = Cli::try_parse_from(["site-walker", "--site", site]);
            assert!(result.is_err(), "{} should be rejected", site);
        }
        let cli = Cli::try_parse_from(["site-walker", "--site", "http://127.0.0.1:8080/a?b=1"])
            .unwrap();
        assert_eq!(cli.site, "http://127.0.0.1:8080/a?b=1");
    }

    #[test]
    fn test_headless_chrome_flag_and_env() {
        let cli = Cli::try_parse_from([
            "site-walker",
            "--site",
            "https://example.com",
            "--headless-chrome",
        ])
        .unwrap();
        assert!(cli.headless_chrome);

        // Only this test touches HEADLESS_CHROME
        let cases = [
            ("1", true),
            ("t", true),
            ("TRUE", true),
            ("yes", true),
            ("0", false),
            ("false", false),
            ("off", false),
        ];
        for (value, want) in cases {
            std::env::set_var("HEADLESS_CHROME", value);
            let cli = Cli::try_parse_from(["site-walker", "--site", "https://example.com"]);
            std::env::remove_var("HEADLESS_CHROME");
            assert_eq!(cli.unwrap().headless_chrome, want, "HEADLESS_CHROME={}", value);
        }
    }

    #[test]
    fn test_url_pattern_env_var_is_singular() {
        use clap::CommandFactory;

        let command = Cli::command();
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == "allowed_url_patterns")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("ALLOWED_URL_PATTERN")));
        // No delimiter: a comma inside a regex stays part of the pattern
        assert_eq!(arg.get_value_delimiter(), None);
    }

    #[test]
    fn test_zero_depth_and_parallelism_are_rejected() {
        for flag in ["--depth", "--parallelism"] {
            let result =
                Cli::try_parse_from(["site-walker", "--site", "https://example.com", flag, "0"]);
            assert!(result.is_err(), "{} 0 should be rejected", flag);
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does env = "..." do?
//    - If the flag isn't given, clap looks up that environment variable
//    - Handy in containers and CI, where env vars are easier than arguments
//
// 2. Why RangedU64ValueParser with .range(1..)?
//    - clap validates the number for us and prints a helpful error
//    - A depth or parallelism of 0 would mean "do nothing" or "never start"
//
// 3. value_delimiter = ','
//    - Splits "a,b,c" into vec!["a", "b", "c"]
//    - Not used for URL patterns: a regex may itself contain a comma
//
// 4. value_parser = parse_site
//    - Any fn(&str) -> Result<T, E> can be a value parser
//    - The error message is shown to the user next to the flag name
// -----------------------------------------------------------------------------
