use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60 * 24 * 7;
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 120;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MIN_BODY_BYTES: usize = 500;

const APP_DIR: &str = "lineup_terminal";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache_ttl: Duration,
    pub data_dir: PathBuf,
    pub default_library: Option<String>,
    pub search_debounce: Duration,
    pub http_timeout: Duration,
    pub min_body_bytes: usize,
    pub cache_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            data_dir: PathBuf::from("."),
            default_library: None,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            min_body_bytes: DEFAULT_MIN_BODY_BYTES,
            cache_dir: default_cache_dir(),
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` / `.env` (if present) and reads `ROSTER_*` overrides.
    pub fn load() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_env()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let cache_ttl = env_u64("ROSTER_CACHE_TTL_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);
        let data_dir = env_path("ROSTER_DATA_DIR").unwrap_or(defaults.data_dir);
        let default_library = env::var("ROSTER_DEFAULT_LIBRARY")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());
        let search_debounce = Duration::from_millis(
            env_u64("ROSTER_SEARCH_DEBOUNCE_MS")
                .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS)
                .min(2000),
        );
        let http_timeout = Duration::from_secs(
            env_u64("ROSTER_HTTP_TIMEOUT_SECS")
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
                .clamp(1, 120),
        );
        let min_body_bytes = env::var("ROSTER_MIN_BODY_BYTES")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MIN_BODY_BYTES);
        let cache_dir = env_path("ROSTER_CACHE_DIR").or(defaults.cache_dir);

        Self {
            cache_ttl,
            data_dir,
            default_library,
            search_debounce,
            http_timeout,
            min_body_bytes,
            cache_dir,
        }
    }

    pub fn pool_cache_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join("pool_cache.json"))
    }

    pub fn http_cache_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join("http_cache.json"))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join("lineup_terminal.log"))
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

pub fn default_cache_dir() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}
