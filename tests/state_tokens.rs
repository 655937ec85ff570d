use std::time::{Duration, Instant};

use lineup_terminal::library::{FetchOptions, LEGACY_90S_ID, Library, NFLVERSE_ID};
use lineup_terminal::loader::{LoadResult, Origin, fallback_pool};
use lineup_terminal::pool::{Player, normalize_rows};
use lineup_terminal::roster_csv::parse_csv;
use lineup_terminal::search::Slot;
use lineup_terminal::state::{AppState, Delta, ProviderCommand, apply_delta};

fn pool(library_id: &str, csv: &str) -> Vec<Player> {
    let library = Library::new(library_id, "Test", "test", &[], FetchOptions::default());
    normalize_rows(&parse_csv(csv), &library)
}

fn loaded(token: u64, library_id: &str, pool: Vec<Player>, origin: Origin) -> Delta {
    Delta::PoolLoaded {
        token,
        library_id: library_id.to_string(),
        result: LoadResult { pool, origin },
    }
}

fn token_of(cmd: Option<ProviderCommand>) -> u64 {
    match cmd.expect("command") {
        ProviderCommand::LoadLibrary { token, .. } => token,
    }
}

#[test]
fn switching_bumps_the_token_and_clears_the_pool() {
    let mut state = AppState::new();
    state.pool = pool(NFLVERSE_ID, "full_name,position\nA B,QB\n");

    let cmd = state.switch_library(LEGACY_90S_ID);
    let ProviderCommand::LoadLibrary { library, token } = cmd.expect("command");
    assert_eq!(library.id, LEGACY_90S_ID);
    assert_eq!(token, 1);
    assert_eq!(state.library_token, 1);
    assert!(state.pool.is_empty());
    assert_eq!(state.status.as_deref(), Some("Loading Legacy 1990s greats…"));
    assert_eq!(
        state.pool_count_label(),
        "Legacy 1990s greats • 0 players • loading…"
    );
}

#[test]
fn unknown_library_falls_back_to_first() {
    let mut state = AppState::new();
    let cmd = state.switch_library("does-not-exist");
    let ProviderCommand::LoadLibrary { library, .. } = cmd.expect("command");
    assert_eq!(library.id, NFLVERSE_ID);
}

#[test]
fn no_libraries_means_no_command() {
    let mut state = AppState::with_libraries(Vec::new());
    assert!(state.switch_library(NFLVERSE_ID).is_none());
    assert!(state.cycle_library().is_none());
}

#[test]
fn stale_loads_are_discarded() {
    let mut state = AppState::new();
    let first = token_of(state.switch_library(NFLVERSE_ID));
    let second = token_of(state.switch_library(LEGACY_90S_ID));
    assert!(second > first);

    apply_delta(
        &mut state,
        loaded(
            first,
            NFLVERSE_ID,
            pool(NFLVERSE_ID, "full_name,position\nStale Player,QB\n"),
            Origin::Cached,
        ),
    );
    assert!(state.pool.is_empty(), "superseded load must not install");
    assert!(state.logs.back().is_some_and(|l| l.contains("stale")));

    apply_delta(
        &mut state,
        loaded(
            second,
            LEGACY_90S_ID,
            pool(LEGACY_90S_ID, "full_name,position\nFresh Player,QB\n"),
            Origin::Remote {
                source: "data/legacy_roster.csv".to_string(),
            },
        ),
    );
    assert_eq!(state.pool.len(), 1);
    assert_eq!(state.pool[0].name, "Fresh Player");
    assert_eq!(
        state.pool_count_label(),
        "Legacy 1990s greats • 1 players • local asset"
    );
    assert!(state.status.is_none());
}

#[test]
fn origin_decides_the_pool_suffix() {
    let mut state = AppState::new();
    let token = token_of(state.switch_library(NFLVERSE_ID));
    apply_delta(
        &mut state,
        loaded(
            token,
            NFLVERSE_ID,
            pool(NFLVERSE_ID, "full_name,position\nA,QB\n"),
            Origin::Remote {
                source: "https://cdn.jsdelivr.net/gh/nflverse/roster.csv".to_string(),
            },
        ),
    );
    assert!(state.pool_count_label().ends_with("1 players • cdn.jsdelivr.net"));

    let token = token_of(state.switch_library(NFLVERSE_ID));
    apply_delta(
        &mut state,
        loaded(token, NFLVERSE_ID, pool(NFLVERSE_ID, "full_name,position\nA,QB\n"), Origin::Cached),
    );
    assert!(state.pool_count_label().ends_with("1 players (cached)"));

    let library = state.library.clone().expect("library");
    let token = token_of(state.switch_library(NFLVERSE_ID));
    apply_delta(
        &mut state,
        loaded(
            token,
            NFLVERSE_ID,
            fallback_pool(&library),
            Origin::Fallback {
                error: "HTTP 404".to_string(),
            },
        ),
    );
    assert!(state.pool_count_label().ends_with("29 players • fallback"));
    assert_eq!(state.status.as_deref(), Some("Loaded fallback roster data."));
}

#[test]
fn pool_count_uses_thousands_separators() {
    let mut state = AppState::new();
    let token = token_of(state.switch_library(NFLVERSE_ID));
    let mut csv = String::from("full_name,position\n");
    for idx in 0..1234 {
        csv.push_str(&format!("Player {idx},WR\n"));
    }
    apply_delta(&mut state, loaded(token, NFLVERSE_ID, pool(NFLVERSE_ID, &csv), Origin::Cached));
    assert_eq!(
        state.pool_count_label(),
        "nflverse roster (1999-present) • 1,234 players (cached)"
    );
}

#[test]
fn search_is_debounced() {
    let mut state = AppState::new();
    state.pool = pool(NFLVERSE_ID, "full_name,position\nJerry Rice,WR\nRandy Moss,WR\n");
    state.open_picker(Slot::WR1);

    let start = Instant::now();
    state.picker_input('r', start);
    state.picker_input('i', start);
    let debounce = Duration::from_millis(120);

    assert!(!state.run_pending_search(start + Duration::from_millis(50), debounce));
    assert!(state.picker.as_ref().expect("picker").results.is_empty());

    assert!(state.run_pending_search(start + debounce, debounce));
    let picker = state.picker.as_ref().expect("picker");
    assert_eq!(picker.results.len(), 1);
    assert_eq!(picker.results[0].name, "Jerry Rice");
    assert!(picker.pending_since.is_none());

    assert!(!state.run_pending_search(start + debounce * 2, debounce));
}

#[test]
fn completed_load_reruns_open_search() {
    let mut state = AppState::new();
    let token = token_of(state.switch_library(NFLVERSE_ID));
    state.open_picker(Slot::QB);
    let now = Instant::now();
    for ch in "brady".chars() {
        state.picker_input(ch, now);
    }
    state.run_search();
    assert!(state.picker.as_ref().expect("picker").results.is_empty());

    apply_delta(
        &mut state,
        loaded(token, NFLVERSE_ID, pool(NFLVERSE_ID, "full_name,position\nTom Brady,QB\n"), Origin::Cached),
    );
    assert_eq!(state.picker.as_ref().expect("picker").results.len(), 1);
}

#[test]
fn season_filter_cycle_reruns_search() {
    let mut state = AppState::new();
    state.pool = pool(
        NFLVERSE_ID,
        "full_name,position,seasons\nJoe Montana,QB,1979-1994\nPatrick Mahomes,QB,2017-2023\n",
    );
    state.open_picker(Slot::QB);
    for ch in " m".chars() {
        state.picker_input(ch, Instant::now());
    }
    state.run_search();
    assert_eq!(state.picker.as_ref().expect("picker").results.len(), 2);

    state.cycle_season_filter();
    assert_eq!(state.season_filter, "1990s");
    let picker = state.picker.as_ref().expect("picker");
    assert_eq!(picker.results.len(), 1);
    assert_eq!(picker.results[0].name, "Joe Montana");
}

#[test]
fn confirming_a_pick_fills_the_slot_and_closes_the_picker() {
    let mut state = AppState::new();
    state.pool = pool(NFLVERSE_ID, "full_name,position\nJerry Rice,WR\nRandy Moss,WR\n");
    state.open_picker(Slot::WR2);
    for ch in "nd".chars() {
        state.picker_input(ch, Instant::now());
    }
    state.run_search();
    state.select_result_next();

    let picked = state.confirm_pick();
    assert_eq!(picked, Some((Slot::WR2, "Randy Moss".to_string())));
    assert!(state.picker.is_none());
    assert_eq!(state.lineup.get(Slot::WR2), Some("Randy Moss"));
}

#[test]
fn slot_cursor_wraps() {
    let mut state = AppState::new();
    assert_eq!(state.selected_slot(), Slot::LT);
    state.select_slot_prev();
    assert_eq!(state.selected_slot(), Slot::HB);
    state.select_slot_next();
    assert_eq!(state.selected_slot(), Slot::LT);
}
