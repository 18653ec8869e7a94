//! Reading the index and the records it names.
//!
//! A failed index is fatal. A failed record is dropped, logged, and listed in
//! [`LoadReport::failures`]; the rest of the batch still loads.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::BestiaryConfig;
use crate::error::LoadError;
use crate::record::{BundledRecord, Monster, MonsterRecord};

/// One line of the index: a bare file name, or a file with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexEntry {
    Labeled {
        file: String,
        #[serde(default)]
        name: Option<String>,
    },
    Bare(String),
}

impl IndexEntry {
    pub fn file(&self) -> &str {
        match self {
            IndexEntry::Labeled { file, .. } => file,
            IndexEntry::Bare(file) => file,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            IndexEntry::Labeled { name, .. } => name.as_deref(),
            IndexEntry::Bare(_) => None,
        }
    }
}

/// Somewhere records can be fetched from.
pub trait RecordSource: Sync {
    fn fetch_index(&self) -> Result<Vec<IndexEntry>, LoadError>;
    fn fetch_record(&self, file: &str) -> Result<MonsterRecord, LoadError>;
}

/// Records stored as individual JSON files next to an index file.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
    index_file: String,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            index_file: index_file.into(),
        }
    }

    pub fn from_config(cfg: &BestiaryConfig) -> Self {
        Self::new(cfg.data_dir.clone(), cfg.index_file.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RecordSource for DirSource {
    fn fetch_index(&self) -> Result<Vec<IndexEntry>, LoadError> {
        read_json(&self.root.join(&self.index_file))
    }

    fn fetch_record(&self, file: &str) -> Result<MonsterRecord, LoadError> {
        read_json(&self.root.join(file))
    }
}

#[derive(Debug)]
pub struct LoadFailure {
    pub file: String,
    pub error: LoadError,
}

/// Outcome of a batch load. `monsters` keeps index order.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub monsters: Vec<Monster>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    fn from_settled(settled: Vec<Result<Monster, LoadFailure>>) -> Self {
        let mut report = LoadReport::default();
        for outcome in settled {
            match outcome {
                Ok(m) => report.monsters.push(m),
                Err(f) => report.failures.push(f),
            }
        }
        report
    }
}

/// Fetch the index, then every record it lists in parallel, and decorate the
/// ones that load.
pub fn load_monsters<S>(source: &S) -> Result<LoadReport, LoadError>
where
    S: RecordSource + ?Sized,
{
    let entries = source.fetch_index().inspect_err(|e| {
        error!(error = %e, "failed to load index");
    })?;

    let settled: Vec<Result<Monster, LoadFailure>> = entries
        .par_iter()
        .map(|entry| {
            let file = entry.file();
            match source.fetch_record(file) {
                Ok(record) => {
                    debug!(file = %file, "loaded record");
                    Ok(Monster::decorate(file, entry.label(), record))
                }
                Err(error) => {
                    warn!(file = %file, error = %error, "dropping record");
                    Err(LoadFailure {
                        file: file.to_string(),
                        error,
                    })
                }
            }
        })
        .collect();

    let report = LoadReport::from_settled(settled);
    info!(
        loaded = report.monsters.len(),
        failed = report.failures.len(),
        "finished loading records"
    );
    Ok(report)
}

/// Load a bundled array of records. Elements that do not parse as records are
/// dropped and reported; a file that is not a JSON array is fatal.
pub fn load_bundle(path: &Path) -> Result<LoadReport, LoadError> {
    let items: Vec<Value> = read_json(path).inspect_err(|e| {
        error!(error = %e, "failed to load bundle");
    })?;

    let settled = items
        .into_iter()
        .enumerate()
        .map(|(pos, item)| match serde_json::from_value::<BundledRecord>(item) {
            Ok(bundled) => {
                let file = bundled
                    .file
                    .clone()
                    .unwrap_or_else(|| fallback_file_name(bundled.record.name.as_deref(), pos));
                Ok(Monster::decorate(file, bundled.display_name.as_deref(), bundled.record))
            }
            Err(source) => {
                let file = format!("{}[{}]", path.display(), pos);
                warn!(file = %file, error = %source, "dropping bundled record");
                Err(LoadFailure {
                    file,
                    error: LoadError::json(path, source),
                })
            }
        })
        .collect();

    let report = LoadReport::from_settled(settled);
    info!(loaded = report.monsters.len(), failed = report.failures.len(), "finished loading bundle");
    Ok(report)
}

fn fallback_file_name(name: Option<&str>, pos: usize) -> String {
    match name.filter(|n| !n.trim().is_empty()) {
        Some(n) => format!("{}.json", n.trim().to_lowercase().replace(' ', "-")),
        None => format!("record-{}.json", pos),
    }
}

/// Read a text file, honoring a UTF-8 or UTF-16 byte order mark.
pub fn read_text(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub(crate) fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, LoadError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| LoadError::json(path, e))
}
