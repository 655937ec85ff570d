//! Tries a library's candidate sources in order and returns the first usable body.
//!
//! Remote sources go over HTTP; anything else is treated as a bundled file
//! relative to the configured data directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::http_cache::HttpCache;
use crate::http_client::http_client;
use crate::library::{CacheMode, FetchOptions, is_remote_url};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("unexpected small file from {url} ({len} chars)")]
    TooSmall { url: String, len: usize },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("http client unavailable: {0}")]
    Client(#[source] reqwest::Error),

    #[error("all sources failed")]
    NoSources,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub text: String,
    pub source: String,
}

pub struct SourceFetcher {
    data_dir: PathBuf,
    min_body_bytes: usize,
    timeout: Duration,
    http_cache: HttpCache,
}

impl SourceFetcher {
    pub fn new(
        data_dir: PathBuf,
        min_body_bytes: usize,
        timeout: Duration,
        http_cache: HttpCache,
    ) -> Self {
        Self {
            data_dir,
            min_body_bytes,
            timeout,
            http_cache,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.data_dir.clone(),
            config.min_body_bytes,
            config.http_timeout,
            HttpCache::new(config.http_cache_path()),
        )
    }

    /// Returns the first source that answers with a success status and a body
    /// of at least `min_body_bytes` UTF-16 units. When every source fails the last error is
    /// returned.
    pub fn fetch_first_working(
        &self,
        urls: &[String],
        options: FetchOptions,
    ) -> Result<Fetched, FetchError> {
        let mut last_error = None;
        for url in urls {
            match self.fetch_one(url, options) {
                Ok(text) => {
                    info!(source = %url, bytes = text.len(), "roster source loaded");
                    return Ok(Fetched {
                        text,
                        source: url.clone(),
                    });
                }
                Err(err) => {
                    warn!(source = %url, error = %err, "roster source failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or(FetchError::NoSources))
    }

    fn fetch_one(&self, url: &str, options: FetchOptions) -> Result<String, FetchError> {
        let text = if is_remote_url(url) {
            self.fetch_remote(url, options)?
        } else {
            let path = self.resolve_local(url);
            debug!(path = %path.display(), "reading bundled roster");
            fs::read_to_string(&path).map_err(|source| FetchError::Io { path, source })?
        };

        // Length in UTF-16 units, matching the size the browser-side loader checks.
        let len = text.encode_utf16().count();
        if len < self.min_body_bytes {
            return Err(FetchError::TooSmall {
                url: url.to_string(),
                len,
            });
        }
        Ok(text)
    }

    fn fetch_remote(&self, url: &str, options: FetchOptions) -> Result<String, FetchError> {
        let client = http_client(self.timeout).map_err(FetchError::Client)?;
        match options.cache {
            CacheMode::ForceCache => self.http_cache.fetch_text(client, url),
            CacheMode::NoCache => {
                let resp = client
                    .get(url)
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache")
                    .send()
                    .map_err(|source| FetchError::Request {
                        url: url.to_string(),
                        source,
                    })?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                resp.text().map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })
            }
        }
    }

    fn resolve_local(&self, url: &str) -> PathBuf {
        let trimmed = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(trimmed);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

/// Host of an http(s) source, or an empty string when it has none.
pub fn source_host(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(|host| match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }))
        .unwrap_or_default()
}
