use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::pool::Player;

const CACHE_KEY_BASE: &str = "nfl_lineup_players_v3";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// Milliseconds since the unix epoch.
    ts: i64,
    pool: Vec<Player>,
}

/// Per-library pool snapshots stored in one JSON file.
///
/// Writes hold `write_lock` across load, modify and save so concurrent loads
/// never drop each other's entries.
#[derive(Debug)]
pub struct PoolCache {
    path: Option<PathBuf>,
    ttl: Duration,
    write_lock: Mutex<()>,
}

pub fn cache_key(library_id: &str) -> String {
    format!("{CACHE_KEY_BASE}_{library_id}")
}

impl PoolCache {
    pub fn new(path: Option<PathBuf>, ttl: Duration) -> Self {
        Self {
            path,
            ttl,
            write_lock: Mutex::new(()),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            path: None,
            ttl: Duration::ZERO,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn read(&self, library_id: &str) -> Option<Vec<Player>> {
        self.read_at(library_id, Utc::now().timestamp_millis())
    }

    /// Returns the cached pool when present and younger than the TTL at `now_ms`.
    pub fn read_at(&self, library_id: &str, now_ms: i64) -> Option<Vec<Player>> {
        if library_id.is_empty() {
            return None;
        }
        let path = self.path.as_ref()?;
        let cache = match load_cache_file(path) {
            Ok(Some(cache)) => cache,
            Ok(None) => return None,
            Err(err) => {
                warn!(library_id, error = %err, "unable to read roster cache");
                return None;
            }
        };
        let entry = cache.entries.get(&cache_key(library_id))?;
        let age_ms = now_ms.saturating_sub(entry.ts);
        if age_ms > self.ttl.as_millis().min(i64::MAX as u128) as i64 {
            debug!(library_id, age_ms, "roster cache entry expired");
            return None;
        }
        Some(entry.pool.clone())
    }

    pub fn write(&self, library_id: &str, pool: &[Player]) {
        self.write_at(library_id, pool, Utc::now().timestamp_millis());
    }

    /// Stores `pool` stamped with `ts_ms`. Failures are logged and swallowed.
    pub fn write_at(&self, library_id: &str, pool: &[Player], ts_ms: i64) {
        if library_id.is_empty() {
            return;
        }
        let Some(path) = self.path.as_ref() else {
            return;
        };
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = store_entry(path, library_id, pool, ts_ms) {
            warn!(library_id, error = %err, "unable to persist roster cache");
        }
    }
}

fn store_entry(path: &Path, library_id: &str, pool: &[Player], ts_ms: i64) -> Result<()> {
    let mut cache = load_cache_file(path).ok().flatten().unwrap_or_default();
    cache.version = CACHE_VERSION;
    cache.entries.insert(
        cache_key(library_id),
        CacheEntry {
            ts: ts_ms,
            pool: pool.to_vec(),
        },
    );
    save_cache_file(path, &cache)
}

fn load_cache_file(path: &Path) -> Result<Option<CacheFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster cache {}", path.display()))?;
    let cache = serde_json::from_str::<CacheFile>(&raw).context("parse roster cache")?;
    if cache.version != CACHE_VERSION {
        return Ok(None);
    }
    Ok(Some(cache))
}

fn save_cache_file(path: &Path, cache: &CacheFile) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let json = serde_json::to_string(cache).context("serialize roster cache")?;
    let mut tmp = NamedTempFile::new_in(dir).context("create roster cache temp file")?;
    tmp.write_all(json.as_bytes()).context("write roster cache")?;
    tmp.persist(path).context("swap roster cache")?;
    Ok(())
}
