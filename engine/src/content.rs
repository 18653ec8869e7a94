use std::collections::HashMap;

use crate::error::LoadError;
use crate::loader::{IndexEntry, RecordSource};
use crate::record::MonsterRecord;

const BUILTIN_INDEX: &str = include_str!("../content/monsters/index.json");

pub fn builtin_monsters() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("goblin.json", include_str!("../content/monsters/goblin.json")),
        ("goblin-boss.json", include_str!("../content/monsters/goblin-boss.json")),
        ("wolf.json", include_str!("../content/monsters/wolf.json")),
        ("awakened-shrub.json", include_str!("../content/monsters/awakened-shrub.json")),
        ("adult-red-dragon.json", include_str!("../content/monsters/adult-red-dragon.json")),
        ("shambling-heap.json", include_str!("../content/monsters/shambling-heap.json")),
    ])
}

/// Sample bestiary compiled into the binary.
#[derive(Debug, Clone)]
pub struct BuiltinSource {
    records: HashMap<&'static str, &'static str>,
}

impl Default for BuiltinSource {
    fn default() -> Self {
        Self { records: builtin_monsters() }
    }
}

impl RecordSource for BuiltinSource {
    fn fetch_index(&self) -> Result<Vec<IndexEntry>, LoadError> {
        serde_json::from_str(BUILTIN_INDEX).map_err(|e| LoadError::json("builtin:index.json", e))
    }

    fn fetch_record(&self, file: &str) -> Result<MonsterRecord, LoadError> {
        let text = self
            .records
            .get(file)
            .ok_or_else(|| LoadError::NotFound(file.to_string()))?;
        serde_json::from_str(text).map_err(|e| LoadError::json(format!("builtin:{}", file), e))
    }
}
