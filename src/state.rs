use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::fetch::source_host;
use crate::library::{
    Library, SEASON_FILTER_ALL, libraries, library_by_id, next_season_filter, season_filter_by_id,
};
use crate::lineup::Lineup;
use crate::loader::{LoadResult, Origin};
use crate::pool::Player;
use crate::search::{Slot, query_is_searchable, search};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct PickerState {
    pub slot: Option<Slot>,
    pub query: String,
    pub results: Vec<Player>,
    pub results_total: usize,
    pub selected: usize,
    /// Set on every keystroke; the search runs once the debounce has elapsed.
    pub pending_since: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub libraries: Vec<Library>,
    pub library: Option<Library>,
    pub library_token: u64,
    pub pool: Vec<Player>,
    pub pool_suffix: Option<String>,
    pub status: Option<String>,
    pub season_filter: String,
    pub lineup: Lineup,
    pub selected_slot: usize,
    pub picker: Option<PickerState>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub confirm_clear: bool,
}

#[derive(Debug, Clone)]
pub enum Delta {
    PoolLoaded {
        token: u64,
        library_id: String,
        result: LoadResult,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadLibrary { library: Library, token: u64 },
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_libraries(libraries())
    }

    pub fn with_libraries(libraries: Vec<Library>) -> Self {
        let library = libraries.first().cloned();
        Self {
            libraries,
            library,
            library_token: 0,
            pool: Vec::new(),
            pool_suffix: None,
            status: None,
            season_filter: SEASON_FILTER_ALL.to_string(),
            lineup: Lineup::new(),
            selected_slot: 0,
            picker: None,
            logs: VecDeque::new(),
            help_overlay: false,
            confirm_clear: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Makes `library_id` active (unknown ids fall back to the first library)
    /// and returns the load command to hand to the provider. Any load still in
    /// flight is superseded by the new token.
    pub fn switch_library(&mut self, library_id: &str) -> Option<ProviderCommand> {
        let library = library_by_id(&self.libraries, library_id)
            .or_else(|| self.libraries.first())
            .cloned()?;

        self.library_token += 1;
        self.pool.clear();
        self.pool_suffix = None;
        self.status = Some(format!("Loading {}…", library.label));
        self.library = Some(library.clone());
        if let Some(picker) = self.picker.as_mut() {
            picker.results.clear();
            picker.results_total = 0;
            picker.selected = 0;
        }

        Some(ProviderCommand::LoadLibrary {
            library,
            token: self.library_token,
        })
    }

    pub fn cycle_library(&mut self) -> Option<ProviderCommand> {
        if self.libraries.is_empty() {
            return None;
        }
        let next = match self.library.as_ref() {
            Some(current) => {
                let idx = self
                    .libraries
                    .iter()
                    .position(|l| l.id == current.id)
                    .map(|idx| (idx + 1) % self.libraries.len())
                    .unwrap_or(0);
                self.libraries[idx].id.clone()
            }
            None => self.libraries[0].id.clone(),
        };
        self.switch_library(&next)
    }

    pub fn cycle_season_filter(&mut self) {
        self.season_filter = next_season_filter(&self.season_filter).id.to_string();
        self.rerun_search_if_ready();
    }

    pub fn season_filter_label(&self) -> &'static str {
        season_filter_by_id(&self.season_filter)
            .map(|f| f.label)
            .unwrap_or("All seasons")
    }

    pub fn library_label(&self) -> &str {
        self.library
            .as_ref()
            .map(|l| l.label.as_str())
            .unwrap_or("Player library")
    }

    pub fn pool_count_label(&self) -> String {
        let suffix = match self.pool_suffix.as_deref() {
            Some(extra) => extra.to_string(),
            None if self.pool.is_empty() && self.library.is_some() => " • loading…".to_string(),
            None => String::new(),
        };
        format!(
            "{} • {} players{}",
            self.library_label(),
            format_count(self.pool.len()),
            suffix
        )
    }

    pub fn selected_slot(&self) -> Slot {
        Slot::ALL[self.selected_slot.min(Slot::ALL.len() - 1)]
    }

    pub fn select_slot_next(&mut self) {
        self.selected_slot = (self.selected_slot + 1) % Slot::ALL.len();
    }

    pub fn select_slot_prev(&mut self) {
        if self.selected_slot == 0 {
            self.selected_slot = Slot::ALL.len() - 1;
        } else {
            self.selected_slot -= 1;
        }
    }

    pub fn open_picker(&mut self, slot: Slot) {
        self.picker = Some(PickerState {
            slot: Some(slot),
            ..PickerState::default()
        });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    pub fn picker_input(&mut self, ch: char, now: Instant) {
        if let Some(picker) = self.picker.as_mut() {
            picker.query.push(ch);
            picker.pending_since = Some(now);
        }
    }

    pub fn picker_backspace(&mut self, now: Instant) {
        if let Some(picker) = self.picker.as_mut() {
            picker.query.pop();
            picker.pending_since = Some(now);
        }
    }

    /// Runs the debounced search once `debounce` has passed since the last
    /// keystroke. Returns true when a search ran.
    pub fn run_pending_search(&mut self, now: Instant, debounce: Duration) -> bool {
        let due = self
            .picker
            .as_ref()
            .and_then(|p| p.pending_since)
            .is_some_and(|since| now.saturating_duration_since(since) >= debounce);
        if !due {
            return false;
        }
        self.run_search();
        true
    }

    pub fn run_search(&mut self) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        picker.pending_since = None;
        let found = search(&self.pool, picker.slot, &picker.query, &self.season_filter);
        picker.results_total = found.total;
        picker.results = found.players.into_iter().cloned().collect();
        if picker.selected >= picker.results.len() {
            picker.selected = 0;
        }
    }

    fn rerun_search_if_ready(&mut self) {
        let ready = self
            .picker
            .as_ref()
            .is_some_and(|p| p.slot.is_some() && query_is_searchable(&p.query));
        if ready {
            self.run_search();
        }
    }

    pub fn select_result_next(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            let total = picker.results.len();
            picker.selected = if total == 0 {
                0
            } else {
                (picker.selected + 1) % total
            };
        }
    }

    pub fn select_result_prev(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            let total = picker.results.len();
            picker.selected = if total == 0 {
                0
            } else if picker.selected == 0 {
                total - 1
            } else {
                picker.selected - 1
            };
        }
    }

    /// Assigns the highlighted result to the picker's slot and closes the picker.
    pub fn confirm_pick(&mut self) -> Option<(Slot, String)> {
        let picker = self.picker.as_ref()?;
        let slot = picker.slot?;
        let name = picker.results.get(picker.selected)?.name.clone();
        self.lineup.set_slot(slot, name.clone());
        self.close_picker();
        Some((slot, name))
    }

    pub fn clear_lineup(&mut self) {
        self.lineup.clear();
        self.confirm_clear = false;
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::PoolLoaded {
            token,
            library_id,
            result,
        } => {
            if token != state.library_token {
                state.push_log(format!("[INFO] Discarded stale load for {library_id}"));
                return;
            }

            state.pool = result.pool;
            let is_local = state.library.as_ref().is_some_and(Library::is_local);
            match result.origin {
                Origin::Cached => {
                    state.pool_suffix = Some(" (cached)".to_string());
                    state.status = None;
                }
                Origin::Fallback { error } => {
                    state.pool_suffix = Some(" • fallback".to_string());
                    state.status = Some("Loaded fallback roster data.".to_string());
                    state.push_log(format!("[WARN] {library_id} failed, using fallback: {error}"));
                }
                Origin::Remote { source } => {
                    let host = if is_local {
                        "local asset".to_string()
                    } else {
                        source_host(&source)
                    };
                    state.pool_suffix = Some(if host.is_empty() {
                        String::new()
                    } else {
                        format!(" • {host}")
                    });
                    state.status = None;
                }
            }
            let count = state.pool.len();
            state.push_log(format!("[INFO] Loaded {count} players from {library_id}"));
            state.rerun_search_if_ready();
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
