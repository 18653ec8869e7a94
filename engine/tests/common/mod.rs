#![allow(dead_code)]

use std::collections::HashMap;

use bestiary::{IndexEntry, LoadError, Monster, MonsterRecord, RecordSource};
use serde_json::json;

/// Decorated monster built from inline JSON.
pub fn monster(file: &str, value: serde_json::Value) -> Monster {
    let record: MonsterRecord = serde_json::from_value(value).unwrap();
    Monster::decorate(file, None, record)
}

pub fn named(name: &str, cr: Option<&str>) -> Monster {
    let value = match cr {
        Some(cr) => json!({ "name": name, "cr": cr }),
        None => json!({ "name": name }),
    };
    monster(&format!("{}.json", name.to_lowercase().replace(' ', "-")), value)
}

/// In-memory source; files listed in `broken` fail to fetch.
#[derive(Default)]
pub struct MemorySource {
    pub index: Vec<IndexEntry>,
    pub records: HashMap<String, serde_json::Value>,
    pub index_fails: bool,
}

impl MemorySource {
    pub fn with(mut self, file: &str, label: Option<&str>, value: Option<serde_json::Value>) -> Self {
        self.index.push(IndexEntry::Labeled {
            file: file.to_string(),
            name: label.map(str::to_string),
        });
        if let Some(v) = value {
            self.records.insert(file.to_string(), v);
        }
        self
    }
}

impl RecordSource for MemorySource {
    fn fetch_index(&self) -> Result<Vec<IndexEntry>, LoadError> {
        if self.index_fails {
            return Err(LoadError::NotFound("index.json".into()));
        }
        Ok(self.index.clone())
    }

    fn fetch_record(&self, file: &str) -> Result<MonsterRecord, LoadError> {
        let value = self
            .records
            .get(file)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(file.to_string()))?;
        Ok(serde_json::from_value(value).unwrap())
    }
}
