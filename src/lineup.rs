use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde_json::{Map, Value};

use crate::pool::Player;
use crate::search::Slot;

pub const EXPORT_JSON_FILE: &str = "all_time_lineup.json";
pub const EXPORT_XLSX_FILE: &str = "all_time_lineup.xlsx";
pub const EMPTY_SLOT: &str = "—";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineup {
    by_slot: HashMap<Slot, String>,
}

impl Lineup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_slot(&mut self, slot: Slot, name: impl Into<String>) {
        self.by_slot.insert(slot, name.into());
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.by_slot.get(&slot).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.by_slot.clear();
    }

    pub fn filled(&self) -> usize {
        self.by_slot.len()
    }

    /// Every slot in display order, with a dash for empty ones.
    pub fn entries(&self) -> Vec<(Slot, &str)> {
        Slot::ALL
            .iter()
            .map(|slot| (*slot, self.get(*slot).unwrap_or(EMPTY_SLOT)))
            .collect()
    }

    /// Filled slots only, keyed by label in display order.
    pub fn to_json(&self) -> Result<String> {
        let mut map = Map::new();
        for slot in Slot::ALL {
            if let Some(name) = self.get(slot) {
                map.insert(slot.label().to_string(), Value::String(name.to_string()));
            }
        }
        serde_json::to_string_pretty(&Value::Object(map)).context("serialize lineup")
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("failed writing {}", path.display()))
    }

    /// Writes a single "Lineup" sheet. Picks are matched back to `pool` by name
    /// (and slot eligibility) to fill in position and seasons.
    pub fn export_xlsx(&self, path: &Path, pool: &[Player]) -> Result<usize> {
        let mut rows = vec![vec![
            "Slot".to_string(),
            "Player".to_string(),
            "Position".to_string(),
            "Seasons".to_string(),
            "Library".to_string(),
        ]];
        for (slot, name) in self.entries() {
            let player = self
                .get(slot)
                .and_then(|picked| find_pick(pool, slot, picked));
            rows.push(vec![
                slot.label().to_string(),
                name.to_string(),
                player.map(|p| p.position.clone()).unwrap_or_default(),
                player.map(|p| p.seasons.clone()).unwrap_or_default(),
                player.map(|p| p.library_label.clone()).unwrap_or_default(),
            ]);
        }

        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name("Lineup")?;
            write_rows(sheet, &rows)?;
        }
        workbook
            .save(path)
            .with_context(|| format!("failed writing workbook to {}", path.display()))?;
        Ok(rows.len().saturating_sub(1))
    }
}

fn find_pick<'a>(pool: &'a [Player], slot: Slot, name: &str) -> Option<&'a Player> {
    pool.iter()
        .find(|p| p.name == name && slot.accepts(&p.position))
        .or_else(|| pool.iter().find(|p| p.name == name))
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
