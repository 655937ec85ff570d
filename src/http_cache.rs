use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fetch::FetchError;

const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct HttpCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: i64,
}

/// Conditional-GET cache for remote CSV sources, persisted as one JSON file.
#[derive(Debug)]
pub struct HttpCache {
    path: Option<PathBuf>,
    entries: Mutex<Option<HttpCacheFile>>,
}

impl HttpCache {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            entries: Mutex::new(None),
        }
    }

    /// GETs `url`, revalidating against a stored ETag / Last-Modified.
    /// A 304 answers with the stored body.
    pub fn fetch_text(&self, client: &Client, url: &str) -> Result<String, FetchError> {
        let cached_entry = self.with_entries(|cache| cache.entries.get(url).cloned());

        let mut req = client.get(url);
        if let Some(entry) = cached_entry.as_ref() {
            if let Some(etag) = entry.etag.as_ref() {
                req = req.header(IF_NONE_MATCH, etag);
            }
            if let Some(last_modified) = entry.last_modified.as_ref() {
                req = req.header(IF_MODIFIED_SINCE, last_modified);
            }
        }

        let resp = req.send().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = resp.status();
        if status == StatusCode::NOT_MODIFIED {
            if let Some(entry) = cached_entry {
                debug!(url, "source not modified, reusing stored body");
                return Ok(entry.body);
            }
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let headers = resp.headers().clone();
        let body = resp.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let etag = headers
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let last_modified = headers
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let entry = CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: Utc::now().timestamp(),
        };
        self.refresh_entry(url, entry);
        Ok(body)
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HttpCacheFile) -> T) -> T {
        let mut guard = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let cache = guard.get_or_insert_with(|| load_cache_file(self.path.as_deref()));
        f(cache)
    }

    fn refresh_entry(&self, key: &str, entry: CacheEntry) {
        let result = self.with_entries(|cache| {
            cache.version = CACHE_VERSION;
            cache.entries.insert(key.to_string(), entry);
            save_cache_file(self.path.as_deref(), cache)
        });
        if let Err(err) = result {
            warn!(url = key, error = %err, "unable to persist http cache");
        }
    }
}

fn load_cache_file(path: Option<&Path>) -> HttpCacheFile {
    let Some(path) = path else {
        return HttpCacheFile::default();
    };
    let Ok(raw) = fs::read_to_string(path) else {
        return HttpCacheFile::default();
    };
    let cache = serde_json::from_str::<HttpCacheFile>(&raw).unwrap_or_default();
    if cache.version != CACHE_VERSION {
        return HttpCacheFile::default();
    }
    cache
}

fn save_cache_file(path: Option<&Path>, cache: &HttpCacheFile) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(cache).context("serialize http cache")?;
    fs::write(&tmp, json).context("write http cache")?;
    fs::rename(&tmp, path).context("swap http cache")?;
    Ok(())
}
