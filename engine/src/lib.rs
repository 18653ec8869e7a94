use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod config;
pub mod content;
pub mod cr;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod maintenance;
pub mod record;
pub mod sort;
pub mod statblock;
pub mod tracker;

pub use catalog::Catalog;
pub use config::BestiaryConfig;
pub use cr::{clean_cr, parse_cr, CrValue};
pub use error::LoadError;
pub use filter::{filter, FilterState, CREATURE_TYPES};
pub use loader::{load_bundle, load_monsters, DirSource, IndexEntry, LoadReport, RecordSource};
pub use record::{BundledRecord, Monster, MonsterRecord};
pub use sort::{compare, group_by_cr, sort_monsters, sorted, CrGroup};
pub use tracker::{Tracker, TrackerEntry};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

pub struct Dice { rng: ChaCha8Rng }

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn d20(&mut self, mode: AdMode) -> u8 {
        let mut roll = || self.rng.gen_range(1..=20);
        match mode {
            AdMode::Normal => roll(),
            AdMode::Advantage => { let a = roll(); let b = roll(); a.max(b) }
            AdMode::Disadvantage => { let a = roll(); let b = roll(); a.min(b) }
        }
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // Computed in i64; the result always fits back in i32.
    ((i64::from(score) - 10).div_euclid(2)) as i32
}
