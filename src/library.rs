//! Built-in roster sources and season filters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheMode {
    /// Revalidate through the on-disk HTTP cache (ETag / Last-Modified).
    ForceCache,
    /// Always hit the source.
    NoCache,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub cache: CacheMode,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            cache: CacheMode::ForceCache,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub id: String,
    pub label: String,
    pub tag: String,
    pub urls: Vec<String>,
    pub fetch: FetchOptions,
}

impl Library {
    pub fn new(id: &str, label: &str, tag: &str, urls: &[&str], fetch: FetchOptions) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            tag: tag.to_string(),
            urls: urls.iter().map(|url| url.to_string()).collect(),
            fetch,
        }
    }

    /// Short label shown next to each player; falls back to the full label.
    pub fn display_tag(&self) -> &str {
        if self.tag.is_empty() {
            &self.label
        } else {
            &self.tag
        }
    }

    /// True when every candidate URL is a bundled file rather than a remote host.
    pub fn is_local(&self) -> bool {
        !self.urls.is_empty() && self.urls.iter().all(|url| !is_remote_url(url))
    }
}

pub const NFLVERSE_ID: &str = "nflverse";
pub const LEGACY_90S_ID: &str = "legacy90s";

pub fn libraries() -> Vec<Library> {
    vec![
        Library::new(
            NFLVERSE_ID,
            "nflverse roster (1999-present)",
            "nflverse",
            &[
                "https://cdn.jsdelivr.net/gh/nflverse/nflfastR-roster/data/roster.csv",
                "https://raw.githubusercontent.com/nflverse/nflfastR-roster/master/data/roster.csv",
                "https://raw.githubusercontent.com/nflverse/nflfastR-roster/master/data/players.csv",
                "https://cdn.jsdelivr.net/gh/nflverse/nflfastR-roster/data/players.csv",
            ],
            FetchOptions {
                cache: CacheMode::ForceCache,
            },
        ),
        Library::new(
            LEGACY_90S_ID,
            "Legacy 1990s greats",
            "90s legacy",
            &["data/legacy_roster.csv"],
            FetchOptions {
                cache: CacheMode::NoCache,
            },
        ),
    ]
}

pub fn library_by_id<'a>(libraries: &'a [Library], id: &str) -> Option<&'a Library> {
    libraries.iter().find(|library| library.id == id)
}

pub fn is_remote_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonFilter {
    pub id: &'static str,
    pub label: &'static str,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

pub const SEASON_FILTER_ALL: &str = "all";

pub const SEASON_FILTERS: &[SeasonFilter] = &[
    SeasonFilter {
        id: SEASON_FILTER_ALL,
        label: "All seasons",
        from: None,
        to: None,
    },
    SeasonFilter {
        id: "1990s",
        label: "1990s standouts",
        from: Some(1990),
        to: Some(1999),
    },
    SeasonFilter {
        id: "2000s",
        label: "2000s (2000-2009)",
        from: Some(2000),
        to: Some(2009),
    },
    SeasonFilter {
        id: "2010s",
        label: "2010s (2010-2019)",
        from: Some(2010),
        to: Some(2019),
    },
    SeasonFilter {
        id: "2020s",
        label: "2020s (2020-present)",
        from: Some(2020),
        to: None,
    },
    SeasonFilter {
        id: "pre1990",
        label: "Pre-1990 legends",
        from: None,
        to: Some(1989),
    },
];

pub fn season_filter_by_id(id: &str) -> Option<&'static SeasonFilter> {
    SEASON_FILTERS.iter().find(|filter| filter.id == id)
}

pub fn next_season_filter(current: &str) -> &'static SeasonFilter {
    let idx = SEASON_FILTERS
        .iter()
        .position(|filter| filter.id == current)
        .map(|idx| (idx + 1) % SEASON_FILTERS.len())
        .unwrap_or(0);
    &SEASON_FILTERS[idx]
}
