//! Housekeeping over a data directory: regenerate the index, bundle every
//! record into one array, and move tagged records aside.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::BestiaryConfig;
use crate::error::LoadError;
use crate::loader::{load_monsters, read_json, RecordSource};
use crate::record::{BundledRecord, MonsterRecord};

/// Sorted `*.json` file names in `dir`, leaving out the index and the bundle.
pub fn record_files(dir: &Path, cfg: &BestiaryConfig) -> Result<Vec<String>, LoadError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if name.ends_with(".json") && name != cfg.index_file && name != cfg.bundle_file {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Rewrite the index of `dir` as a JSON array of file names.
pub fn generate_index(dir: &Path, cfg: &BestiaryConfig) -> Result<Vec<String>, LoadError> {
    let files = record_files(dir, cfg)?;
    let path = dir.join(&cfg.index_file);
    write_json(&path, &files)?;
    info!(count = files.len(), path = %path.display(), "generated index");
    Ok(files)
}

/// Load every record named by the source's index and write them as one array.
/// Records that fail to load are skipped. Returns how many were written.
pub fn bundle<S>(source: &S, out: &Path) -> Result<usize, LoadError>
where
    S: RecordSource + ?Sized,
{
    let report = load_monsters(source)?;
    let bundled: Vec<BundledRecord> = report.monsters.iter().map(BundledRecord::from).collect();
    write_json(out, &bundled)?;
    info!(count = bundled.len(), skipped = report.failures.len(), path = %out.display(), "bundled records");
    Ok(bundled.len())
}

/// Move every record in `dir` tagged `tag` into `archive_dir`. Files that do
/// not parse or cannot be moved stay where they are. Returns the moved file
/// names.
pub fn archive_tagged(
    dir: &Path,
    archive_dir: &Path,
    tag: &str,
    cfg: &BestiaryConfig,
) -> Result<Vec<String>, LoadError> {
    let mut moved = Vec::new();
    for file in record_files(dir, cfg)? {
        let path = dir.join(&file);
        let record: MonsterRecord = match read_json(&path) {
            Ok(r) => r,
            Err(e) => {
                warn!(file = %file, error = %e, "could not parse record; leaving it in place");
                continue;
            }
        };
        if !record.tags.iter().any(|t| t == tag) {
            continue;
        }
        fs::create_dir_all(archive_dir).map_err(|e| LoadError::io(archive_dir, e))?;
        let dest: PathBuf = archive_dir.join(&file);
        if let Err(e) = fs::rename(&path, &dest) {
            warn!(file = %file, dest = %dest.display(), error = %e, "could not move record; leaving it in place");
            continue;
        }
        info!(file = %file, dest = %dest.display(), "archived record");
        moved.push(file);
    }
    Ok(moved)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), LoadError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| LoadError::json(path, e))?;
    fs::write(path, text).map_err(|e| LoadError::io(path, e))
}
