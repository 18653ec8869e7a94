use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::loader::read_text;

/// Where the bestiary lives on disk and how the tools behave. Every key is
/// optional in the file; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BestiaryConfig {
    pub data_dir: PathBuf,
    pub index_file: String,
    pub bundle_file: String,
    /// Destination for records moved out by `archive`.
    pub archive_dir: PathBuf,
    pub archive_tag: String,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Seed for initiative rolls.
    pub seed: u64,
}

impl Default for BestiaryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            index_file: "index.json".to_string(),
            bundle_file: "monsters.json".to_string(),
            archive_dir: PathBuf::from("olddata"),
            archive_tag: "homebrew".to_string(),
            log_filter: "info".to_string(),
            seed: 42,
        }
    }
}

impl BestiaryConfig {
    /// Load from YAML or JSON, picked by extension. Unknown extensions are read
    /// as YAML, which also accepts JSON.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = read_text(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| LoadError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(&self.index_file)
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.data_dir.join(&self.bundle_file)
    }
}
