use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::library::Library;
use crate::roster_csv::CsvRow;

pub const UNKNOWN_POSITION: &str = "—";

const NAME_COLUMNS: &[&str] = &["full_name", "player_name", "name"];
const POSITION_COLUMNS: &[&str] = &["position", "pos"];
const SEASON_COLUMNS: &[&str] = &["season", "seasons", "years_active"];

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)\d{2}").expect("valid year regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub name_lower: String,
    pub position: String,
    pub seasons: String,
    pub library_id: String,
    pub library_label: String,
    pub season_start: Option<i32>,
    pub season_end: Option<i32>,
}

impl Player {
    pub fn dedupe_key(&self) -> String {
        format!("{}|{}", self.name, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonBounds {
    pub start: i32,
    pub end: i32,
}

/// Extracts every 19xx/20xx year from free text and returns the span.
pub fn parse_season_bounds(value: &str) -> Option<SeasonBounds> {
    let mut years = YEAR_RE
        .find_iter(value)
        .filter_map(|m| m.as_str().parse::<i32>().ok());
    let first = years.next()?;
    let (start, end) = years.fold((first, first), |(lo, hi), year| (lo.min(year), hi.max(year)));
    Some(SeasonBounds { start, end })
}

/// Turns parsed CSV rows into a pool: trims names, uppercases positions,
/// derives season bounds and keeps the first row per `name|position`.
pub fn normalize_rows(rows: &[CsvRow], library: &Library) -> Vec<Player> {
    let library_label = library.display_tag().to_string();
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        let name = first_non_empty(row, NAME_COLUMNS).trim().to_string();
        if name.is_empty() {
            continue;
        }
        let position = first_non_empty(row, POSITION_COLUMNS).trim().to_uppercase();
        let seasons = first_non_empty(row, SEASON_COLUMNS).to_string();
        let bounds = parse_season_bounds(&seasons);

        let player = Player {
            name_lower: name.to_lowercase(),
            name,
            position: if position.is_empty() {
                UNKNOWN_POSITION.to_string()
            } else {
                position
            },
            seasons,
            library_id: library.id.clone(),
            library_label: library_label.clone(),
            season_start: bounds.map(|b| b.start),
            season_end: bounds.map(|b| b.end),
        };

        if seen.insert(player.dedupe_key()) {
            out.push(player);
        }
    }

    out
}

fn first_non_empty<'a>(row: &'a CsvRow, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|key| row.get(*key))
        .map(String::as_str)
        .find(|value| !value.is_empty())
        .unwrap_or("")
}
