// src/storage.rs
// =============================================================================
// Saves fetched pages to disk.
//
// Layout: <base_dir>/<host>/<url path>
// - ':' in the host (port numbers) becomes '-', '.' becomes '_'
// - a path without a file extension is treated as a directory and the page
//   is written to index.html inside it
//
// Examples (base_dir = "out"):
//   https://test.com/               -> out/test_com/index.html
//   https://test.com/users/file2    -> out/test_com/users/file2/index.html
//   https://test.com:8080/a.css     -> out/test_com-8080/a.css
//
// Rust concepts:
// - PathBuf: an owned, platform-aware file path
// - anyhow::Context: attach "what we were doing" to I/O errors
// =============================================================================

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::crawl::CrawlResult;

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    // Writes the page body and returns the path it was written to
    pub fn save(&self, result: &CrawlResult) -> Result<PathBuf> {
        let path = self.path_for(&result.url)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        fs::write(&path, &result.body)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }

    fn path_for(&self, url: &Url) -> Result<PathBuf> {
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => bail!("URL has no host: {}", url),
        };

        let mut dir_name = host.replace('.', "_");
        if let Some(port) = url.port() {
            dir_name.push('-');
            dir_name.push_str(&port.to_string());
        }

        let mut path = self.base_dir.join(dir_name);
        // Joining an absolute path would replace base_dir, so push segments
        for segment in url.path().split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }

        if path.extension().is_none() {
            path.push("index.html");
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str) -> CrawlResult {
        CrawlResult {
            url: Url::parse(url).unwrap(),
            depth: 1,
            body: url.as_bytes().to_vec(),
            links: Vec::new(),
        }
    }

    #[test]
    fn test_path_mapping() {
        let storage = FileStorage::new("out");
        let cases = [
            ("https://test.com/", "out/test_com/index.html"),
            ("https://test.com/file1", "out/test_com/file1/index.html"),
            ("https://test.com/users/file2", "out/test_com/users/file2/index.html"),
            ("https://test.com:8080/file3.css", "out/test_com-8080/file3.css"),
            ("https://docs.test.com/a/b.html?x=1", "out/docs_test_com/a/b.html"),
        ];
        for (url, want) in cases {
            let got = storage.path_for(&Url::parse(url).unwrap()).unwrap();
            assert_eq!(got, PathBuf::from(want), "url: {}", url);
        }
    }

    #[test]
    fn test_save_writes_body() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let visited = [
            "https://test.com/",
            "https://test.com/file1",
            "https://test.com/users/file2",
            "https://test.com:8080/file3",
            "https://docs.test.com/file4",
            "https://differenthost.aaa.bbb/",
            "https://differenthost.aaa.bbb/file5",
        ];
        for url in visited {
            let path = storage.save(&result(url)).unwrap();
            assert!(path.starts_with(dir.path()));
            assert_eq!(fs::read(&path).unwrap(), url.as_bytes());
        }
    }

    #[test]
    fn test_url_without_host_is_an_error() {
        let storage = FileStorage::new("out");
        assert!(storage
            .path_for(&Url::parse("mailto:a@test.com").unwrap())
            .is_err());
    }
}
