use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use lineup_terminal::config::AppConfig;
use lineup_terminal::lineup::{EXPORT_JSON_FILE, EXPORT_XLSX_FILE};
use lineup_terminal::logging::init_file_logging;
use lineup_terminal::provider::{LoadContext, spawn_provider};
use lineup_terminal::search::{MAX_RESULTS, Slot, query_is_searchable};
use lineup_terminal::state::{AppState, Delta, PickerState, ProviderCommand, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    search_debounce: Duration,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>, config: &AppConfig) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            search_debounce: config.search_debounce,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.picker.is_some() {
            self.on_picker_key(key);
            return;
        }
        if self.state.confirm_clear {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.state.clear_lineup();
                self.state.push_log("[INFO] Lineup cleared");
            } else {
                self.state.confirm_clear = false;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_slot_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_slot_prev(),
            KeyCode::Enter | KeyCode::Char('p') => {
                let slot = self.state.selected_slot();
                self.state.open_picker(slot);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.cycle_library(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.state.cycle_season_filter(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_json(),
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_xlsx(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.state.confirm_clear = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        let now = Instant::now();
        match key.code {
            KeyCode::Esc => self.state.close_picker(),
            KeyCode::Enter => {
                if let Some((slot, name)) = self.state.confirm_pick() {
                    self.state
                        .push_log(format!("[INFO] {} set to {name}", slot.label()));
                }
            }
            KeyCode::Down => self.state.select_result_next(),
            KeyCode::Up => self.state.select_result_prev(),
            KeyCode::Tab => self.state.cycle_season_filter(),
            KeyCode::F(2) => self.cycle_library(),
            KeyCode::Backspace => self.state.picker_backspace(now),
            KeyCode::Char(ch) => self.state.picker_input(ch, now),
            _ => {}
        }
    }

    fn switch_library(&mut self, library_id: &str) {
        let cmd = self.state.switch_library(library_id);
        self.send(cmd);
    }

    fn cycle_library(&mut self) {
        let cmd = self.state.cycle_library();
        self.send(cmd);
    }

    fn send(&mut self, cmd: Option<ProviderCommand>) {
        let Some(cmd) = cmd else {
            self.state.push_log("[WARN] No data libraries configured");
            return;
        };
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Roster loading unavailable");
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.status = Some("Failed to load roster data.".to_string());
            self.state.push_log("[WARN] Roster load request failed");
        }
    }

    fn export_json(&mut self) {
        match self.state.lineup.export_json(Path::new(EXPORT_JSON_FILE)) {
            Ok(()) => self
                .state
                .push_log(format!("[INFO] Lineup exported to {EXPORT_JSON_FILE}")),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn export_xlsx(&mut self) {
        match self
            .state
            .lineup
            .export_xlsx(Path::new(EXPORT_XLSX_FILE), &self.state.pool)
        {
            Ok(rows) => self.state.push_log(format!(
                "[INFO] Lineup exported to {EXPORT_XLSX_FILE} ({rows} rows)"
            )),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::load();
    if let Some(path) = config.log_path() {
        if let Err(err) = init_file_logging(&path) {
            eprintln!("logging disabled: {err:#}");
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx, LoadContext::from_config(&config));

    let mut app = App::new(Some(cmd_tx), &config);
    let initial = config
        .default_library
        .clone()
        .or_else(|| app.state.library.as_ref().map(|l| l.id.clone()))
        .unwrap_or_default();
    app.switch_library(&initial);

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(40);

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state
            .run_pending_search(Instant::now(), app.search_debounce);

        terminal.draw(|f| ui(f, &app.state))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area);

    let header =
        Paragraph::new(header_text(state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_lineup_screen(frame, chunks[1], state);

    let footer =
        Paragraph::new(footer_text(state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if let Some(picker) = &state.picker {
        render_picker(frame, area, state, picker);
    }
    if state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let line1 = format!("  ALL-TIME LINEUP | {}", state.pool_count_label());
    let line2 = format!("  Seasons: {}", state.season_filter_label());
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> String {
    if state.picker.is_some() {
        return "Type to search | ↑/↓ Move | Enter Select | Tab Seasons | F2 Library | Esc Close"
            .to_string();
    }
    if state.confirm_clear {
        return "Clear all selections? y confirm | any other key cancels".to_string();
    }
    "j/k/↑/↓ Move | Enter Pick | l Library | f Seasons | e JSON | x XLSX | c Clear | ? Help | q Quit"
        .to_string()
}

fn render_lineup_screen(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(area);

    render_lineup_list(frame, columns[0], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(columns[1]);

    let status = state.status.clone().unwrap_or_else(|| "Ready".to_string());
    let status_style = if state.status.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let status = Paragraph::new(status)
        .style(status_style)
        .block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, right[0]);

    let visible = right[1].height.saturating_sub(2) as usize;
    let console = Paragraph::new(console_text(state, visible))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, right[1]);
}

fn render_lineup_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!("Lineup ({}/{})", state.lineup.filled(), Slot::ALL.len()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let selected = state.selected_slot();
    for (i, (slot, name)) in state.lineup.entries().into_iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        let style = if slot == selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(format!("{:<4}", slot.label()), Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }
}

fn console_text(state: &AppState, visible: usize) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(visible.max(1));
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_picker(frame: &mut Frame, area: Rect, state: &AppState, picker: &PickerState) {
    let popup_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup_area);

    let slot_label = picker.slot.map(Slot::label).unwrap_or("-");
    let block = Block::default()
        .title(format!("Pick for {slot_label}"))
        .borders(Borders::ALL);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let allowed = picker
        .slot
        .map(Slot::accepted_label)
        .unwrap_or_else(|| "Any".to_string());
    frame.render_widget(
        Paragraph::new(format!("Allowed positions: {allowed}"))
            .style(Style::default().fg(Color::Gray)),
        sections[0],
    );
    frame.render_widget(
        Paragraph::new(format!(
            "{} | {}",
            state.pool_count_label(),
            state.season_filter_label()
        ))
        .style(Style::default().fg(Color::DarkGray)),
        sections[1],
    );
    frame.render_widget(
        Paragraph::new(format!("Search: {}_", picker.query))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        sections[2],
    );
    if picker.results_total > MAX_RESULTS {
        frame.render_widget(
            Paragraph::new(format!(
                "Showing {MAX_RESULTS} of {} matches",
                picker.results_total
            ))
            .style(Style::default().fg(Color::DarkGray)),
            sections[3],
        );
    }

    render_results(frame, sections[4], picker);
}

fn render_results(frame: &mut Frame, area: Rect, picker: &PickerState) {
    if picker.results.is_empty() {
        let text = if query_is_searchable(&picker.query) && picker.pending_since.is_none() {
            "No matches."
        } else {
            ""
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    }

    const ROW_HEIGHT: u16 = 2;
    let visible = (area.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(picker.selected, picker.results.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + (i as u16) * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT,
        };
        let player = &picker.results[idx];
        let mut meta = vec![player.position.as_str()];
        if !player.seasons.is_empty() {
            meta.push(player.seasons.as_str());
        }
        if !player.library_label.is_empty() {
            meta.push(player.library_label.as_str());
        }
        let style = if idx == picker.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let text = Text::from(vec![
            Line::from(Span::styled(
                player.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                meta.join(" • "),
                Style::default().fg(Color::Gray),
            )),
        ]);
        frame.render_widget(Paragraph::new(text).style(style), row_area);
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "All-Time Lineup - Help",
        "",
        "Lineup:",
        "  j/k or ↑/↓   Move between slots",
        "  Enter / p    Pick a player for the slot",
        "  l            Next player library",
        "  f            Next season filter",
        "  e            Export lineup as JSON",
        "  x            Export lineup as XLSX",
        "  c            Clear lineup (asks first)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Picker:",
        "  type         Search by name (2+ chars)",
        "  ↑/↓          Move",
        "  Enter        Assign player",
        "  Tab / F2     Season filter / library",
        "  Esc          Close",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
