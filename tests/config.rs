use std::env;
use std::time::Duration;

use lineup_terminal::config::{AppConfig, DEFAULT_MIN_BODY_BYTES};
use lineup_terminal::provider::LoadContext;

fn set(key: &str, value: &str) {
    // Only this test binary touches ROSTER_* and it has a single test.
    unsafe { env::set_var(key, value) };
}

#[test]
fn env_overrides_are_parsed_and_clamped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cache_dir = dir.path().join("cache");

    set("ROSTER_SEARCH_DEBOUNCE_MS", "999999");
    set("ROSTER_HTTP_TIMEOUT_SECS", "0");
    set("ROSTER_CACHE_TTL_SECS", "60");
    set("ROSTER_MIN_BODY_BYTES", " 42 ");
    set("ROSTER_DEFAULT_LIBRARY", "  legacy90s ");
    set("ROSTER_DATA_DIR", dir.path().to_str().expect("utf-8 path"));
    set("ROSTER_CACHE_DIR", cache_dir.to_str().expect("utf-8 path"));

    let config = AppConfig::from_env();
    assert_eq!(config.search_debounce, Duration::from_millis(2000));
    assert_eq!(config.http_timeout, Duration::from_secs(1));
    assert_eq!(config.cache_ttl, Duration::from_secs(60));
    assert_eq!(config.min_body_bytes, 42);
    assert_eq!(config.default_library.as_deref(), Some("legacy90s"));
    assert_eq!(config.data_dir, dir.path());
    assert_eq!(config.pool_cache_path(), Some(cache_dir.join("pool_cache.json")));
    assert_eq!(config.http_cache_path(), Some(cache_dir.join("http_cache.json")));

    let ctx = LoadContext::from_config(&config);
    assert_eq!(ctx.cache.path(), Some(cache_dir.join("pool_cache.json").as_path()));

    set("ROSTER_HTTP_TIMEOUT_SECS", "500");
    set("ROSTER_SEARCH_DEBOUNCE_MS", "fast");
    set("ROSTER_MIN_BODY_BYTES", "-1");
    set("ROSTER_DEFAULT_LIBRARY", "   ");
    let config = AppConfig::from_env();
    assert_eq!(config.http_timeout, Duration::from_secs(120));
    assert_eq!(config.search_debounce, Duration::from_millis(120));
    assert_eq!(config.min_body_bytes, DEFAULT_MIN_BODY_BYTES);
    assert!(config.default_library.is_none());
}
