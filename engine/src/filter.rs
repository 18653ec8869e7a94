use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::record::Monster;

/// Creature types offered as type filters.
pub const CREATURE_TYPES: [&str; 14] = [
    "aberration",
    "beast",
    "celestial",
    "construct",
    "dragon",
    "elemental",
    "fey",
    "fiend",
    "giant",
    "humanoid",
    "monstrosity",
    "ooze",
    "plant",
    "undead",
];

/// Active filter selections. Categories combine with AND; values inside one
/// category combine with OR. An empty category places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct FilterState {
    pub query: String,
    pub types: BTreeSet<String>,
    pub crs: BTreeSet<String>,
    pub sources: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_type(mut self, t: impl Into<String>) -> Self {
        self.types.insert(t.into());
        self
    }

    pub fn with_cr(mut self, cr: impl Into<String>) -> Self {
        self.crs.insert(cr.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.insert(source.into());
        self
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Select the type if unselected, otherwise unselect it. Returns whether it
    /// is selected afterwards.
    pub fn toggle_type(&mut self, t: &str) -> bool {
        toggle(&mut self.types, t)
    }

    pub fn toggle_cr(&mut self, cr: &str) -> bool {
        toggle(&mut self.crs, cr)
    }

    pub fn toggle_source(&mut self, source: &str) -> bool {
        toggle(&mut self.sources, source)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.types.is_empty() && self.crs.is_empty() && self.sources.is_empty()
    }

    pub fn matches(&self, monster: &Monster) -> bool {
        if !self.query.is_empty()
            && !monster
                .display_name
                .to_lowercase()
                .contains(&self.query.to_lowercase())
        {
            return false;
        }
        if !self.types.is_empty()
            && !monster
                .creature_type()
                .is_some_and(|t| self.types.contains(t))
        {
            return false;
        }
        if !self.crs.is_empty() && !self.crs.contains(&monster.clean_cr) {
            return false;
        }
        if !self.sources.is_empty()
            && !monster
                .source
                .as_deref()
                .is_some_and(|s| self.sources.contains(s))
        {
            return false;
        }
        true
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

/// Monsters matching `state`, in their original relative order.
pub fn filter<'a, I>(monsters: I, state: &FilterState) -> Vec<&'a Monster>
where
    I: IntoIterator<Item = &'a Monster>,
{
    monsters.into_iter().filter(|m| state.matches(m)).collect()
}
