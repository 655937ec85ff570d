use anyhow::{Context, Result, anyhow};

use lineup_terminal::config::AppConfig;
use lineup_terminal::library::{SEASON_FILTER_ALL, libraries, library_by_id, season_filter_by_id};
use lineup_terminal::loader::{Origin, load_roster};
use lineup_terminal::logging::init_stderr_logging;
use lineup_terminal::provider::LoadContext;
use lineup_terminal::search::{Slot, search};

fn main() -> Result<()> {
    let config = AppConfig::load();
    init_stderr_logging();

    let all = libraries();
    let library_id = arg_value("--library")
        .or_else(|| config.default_library.clone())
        .or_else(|| all.first().map(|l| l.id.clone()))
        .context("no data libraries configured")?;
    let library = library_by_id(&all, &library_id)
        .ok_or_else(|| anyhow!("unknown library: {library_id}"))?;

    let season = arg_value("--season").unwrap_or_else(|| SEASON_FILTER_ALL.to_string());
    if season_filter_by_id(&season).is_none() {
        return Err(anyhow!("unknown season filter: {season}"));
    }

    let ctx = LoadContext::from_config(&config);
    let result = load_roster(library, &ctx.cache, &ctx.fetcher);

    println!("Library: {} ({})", library.label, library.id);
    match &result.origin {
        Origin::Cached => println!("Origin: cache"),
        Origin::Remote { source } => println!("Origin: {source}"),
        Origin::Fallback { error } => println!("Origin: fallback ({error})"),
    }
    println!("Players: {}", result.pool.len());
    if let Some(path) = ctx.cache.path() {
        println!("Cache: {}", path.display());
    }

    let Some(query) = arg_value("--search") else {
        return Ok(());
    };
    let slot_raw = arg_value("--slot").unwrap_or_else(|| "QB".to_string());
    let slot = Slot::from_label(&slot_raw).ok_or_else(|| anyhow!("unknown slot: {slot_raw}"))?;

    let found = search(&result.pool, Some(slot), &query, &season);
    println!(
        "Search {:?} for {} ({}): {} matches",
        query,
        slot.label(),
        slot.accepted_label(),
        found.total
    );
    for player in found.players.iter().take(25) {
        println!("  {:<28} {:<4} {}", player.name, player.position, player.seasons);
    }
    if found.total > 25 {
        println!("  ... {} more", found.total - 25);
    }

    Ok(())
}

fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
