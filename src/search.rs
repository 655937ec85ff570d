use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::library::{SEASON_FILTER_ALL, SeasonFilter, season_filter_by_id};
use crate::pool::Player;

pub const MAX_RESULTS: usize = 200;
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    LT,
    LG,
    C,
    RG,
    RT,
    TE,
    WR1,
    WR2,
    QB,
    FB,
    HB,
}

impl Slot {
    /// Lineup display order: offensive line left to right, then skill spots.
    pub const ALL: [Slot; 11] = [
        Slot::LT,
        Slot::LG,
        Slot::C,
        Slot::RG,
        Slot::RT,
        Slot::TE,
        Slot::WR1,
        Slot::WR2,
        Slot::QB,
        Slot::FB,
        Slot::HB,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Slot::LT => "LT",
            Slot::LG => "LG",
            Slot::C => "C",
            Slot::RG => "RG",
            Slot::RT => "RT",
            Slot::TE => "TE",
            Slot::WR1 => "WR1",
            Slot::WR2 => "WR2",
            Slot::QB => "QB",
            Slot::FB => "FB",
            Slot::HB => "HB",
        }
    }

    pub fn from_label(raw: &str) -> Option<Slot> {
        let upper = raw.trim().to_ascii_uppercase();
        Slot::ALL.into_iter().find(|slot| slot.label() == upper)
    }

    /// Position codes a player may carry to fill this slot. Empty means any.
    pub fn accepted_positions(self) -> &'static [&'static str] {
        match self {
            Slot::QB => &["QB"],
            Slot::HB => &["RB", "HB"],
            Slot::FB => &["FB"],
            Slot::WR1 | Slot::WR2 => &["WR"],
            Slot::TE => &["TE"],
            Slot::LT | Slot::RT => &["T", "OT"],
            Slot::LG | Slot::RG => &["G", "OG"],
            Slot::C => &["C"],
        }
    }

    pub fn accepts(self, position: &str) -> bool {
        let allowed = self.accepted_positions();
        allowed.is_empty() || allowed.contains(&position)
    }

    pub fn accepted_label(self) -> String {
        let allowed = self.accepted_positions();
        if allowed.is_empty() {
            "Any".to_string()
        } else {
            allowed.join(", ")
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResults<'a> {
    pub players: Vec<&'a Player>,
    /// Matches before the result cap was applied.
    pub total: usize,
}

pub fn query_is_searchable(query: &str) -> bool {
    query.chars().count() >= MIN_QUERY_CHARS
}

/// Case-insensitive name search restricted to the slot's positions and the
/// active season filter. Pool order is preserved; at most `MAX_RESULTS` come back.
pub fn search<'a>(
    pool: &'a [Player],
    slot: Option<Slot>,
    query: &str,
    season_filter_id: &str,
) -> SearchResults<'a> {
    let Some(slot) = slot else {
        return SearchResults::default();
    };
    if !query_is_searchable(query) {
        return SearchResults::default();
    }

    let needle = query.to_lowercase();
    let filter = season_filter_by_id(season_filter_id);
    let mut players = pool
        .par_iter()
        .filter(|player| player.name_lower.contains(&needle))
        .filter(|player| matches_season_filter(player, filter))
        .filter(|player| slot.accepts(&player.position))
        .collect::<Vec<_>>();

    let total = players.len();
    players.truncate(MAX_RESULTS);
    SearchResults { players, total }
}

/// Inclusive overlap test between a player's career span and the filter range.
/// Players without any parsed year always pass.
pub fn matches_season_filter(player: &Player, filter: Option<&SeasonFilter>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    if filter.id == SEASON_FILTER_ALL {
        return true;
    }
    let start = player.season_start;
    let end = player.season_end.or(start);
    if start.is_none() && end.is_none() {
        return true;
    }
    if let Some(from) = filter.from {
        match end {
            Some(end) if end >= from => {}
            _ => return false,
        }
    }
    if let Some(to) = filter.to {
        match start {
            Some(start) if start <= to => {}
            _ => return false,
        }
    }
    true
}
