use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::Monster;
use crate::{ability_mod, AdMode, Dice};

/// One row of the initiative table. Everything except `id` is editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrackerEntry {
    pub id: u32,
    pub initiative: Option<i32>,
    pub name: String,
    pub ac: String,
    pub hp: String,
    pub notes: String,
    pub file: String,
    pub dex_mod: i32,
    /// How this combatant's initiative d20 is rolled.
    #[serde(default)]
    pub roll_mode: AdMode,
}

/// In-memory initiative tracker. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    entries: Vec<TrackerEntry>,
    next_id: u32,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a combatant copied from `monster`; returns its id. The same monster
    /// may be added any number of times.
    pub fn add(&mut self, monster: &Monster) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let r = &monster.record;
        let dex_mod = r
            .ability_score("dex")
            .and_then(|s| i32::try_from(s).ok())
            .map(ability_mod)
            .unwrap_or(0);
        self.entries.push(TrackerEntry {
            id,
            initiative: None,
            name: monster.display_name.clone(),
            ac: r.ac.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            hp: r.hp.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            notes: String::new(),
            file: monster.file.clone(),
            dex_mod,
            roll_mode: AdMode::Normal,
        });
        id
    }

    pub fn entries(&self) -> &[TrackerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&TrackerEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: u32) -> Option<&mut TrackerEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Roll d20 + DEX modifier for every entry that has no initiative yet.
    pub fn roll_initiative(&mut self, dice: &mut Dice) {
        for e in self.entries.iter_mut().filter(|e| e.initiative.is_none()) {
            let roll = i32::from(dice.d20(e.roll_mode));
            let total = roll.saturating_add(e.dex_mod);
            debug!(name = %e.name, roll, mode = ?e.roll_mode, dex_mod = e.dex_mod, total, "rolled initiative");
            e.initiative = Some(total);
        }
    }

    pub fn set_initiative(&mut self, id: u32, value: Option<i32>) -> bool {
        self.get_mut(id).map(|e| e.initiative = value).is_some()
    }

    pub fn set_roll_mode(&mut self, id: u32, mode: AdMode) -> bool {
        self.get_mut(id).map(|e| e.roll_mode = mode).is_some()
    }

    pub fn set_hp(&mut self, id: u32, hp: impl Into<String>) -> bool {
        let hp = hp.into();
        self.get_mut(id).map(|e| e.hp = hp).is_some()
    }

    pub fn set_notes(&mut self, id: u32, notes: impl Into<String>) -> bool {
        let notes = notes.into();
        self.get_mut(id).map(|e| e.notes = notes).is_some()
    }

    /// Subtract `amount` from the leading number of the HP cell (`"7 (2d6)"`
    /// counts as 7), floored at 0. A negative amount heals. Returns the new
    /// HP, or `None` when the entry is missing or its HP is not a number.
    pub fn damage(&mut self, id: u32, amount: i32) -> Option<i32> {
        let entry = self.get_mut(id)?;
        let current = leading_int(&entry.hp)?;
        let after = current.saturating_sub(amount).max(0);
        entry.hp = after.to_string();
        Some(after)
    }

    pub fn remove(&mut self, id: u32) -> Option<TrackerEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Turn order: highest initiative first, unrolled entries last, ties in
    /// insertion order.
    pub fn ordered(&self) -> Vec<&TrackerEntry> {
        let mut order: Vec<&TrackerEntry> = self.entries.iter().collect();
        order.sort_by(|a, b| match (a.initiative, b.initiative) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        order
    }
}

fn leading_int(s: &str) -> Option<i32> {
    let digits: String = s.trim_start().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
