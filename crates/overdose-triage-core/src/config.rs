//! Engine configuration file.
//!
//! A JSON file naming the reference data sources and optionally overriding
//! the scoring profile:
//!
//! ```json
//! {
//!   "drugs_path": "data/drugs.json",
//!   "combos_path": "data/combos.json",
//!   "format": "tripsit",
//!   "scoring": { "thresholds": { "moderate": 4, "high": 9, "critical": 15 } }
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::reference::{ConfigError, ConfigResult, ReferenceData, SourceFormat};
use crate::scoring::ScoringProfile;
use crate::triage::TriageEngine;

/// File names looked up in a data directory.
pub const DRUGS_FILE: &str = "drugs.json";
pub const COMBOS_FILE: &str = "combos.json";

/// Where reference data lives and how to score against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Substance catalog file
    pub drugs_path: PathBuf,
    /// Known-combination file
    pub combos_path: PathBuf,
    /// Format of both files (default: native)
    #[serde(default)]
    pub format: SourceFormat,
    /// Scoring profile override (default profile when absent)
    #[serde(default)]
    pub scoring: Option<ScoringProfile>,
}

impl EngineConfig {
    /// Read a config file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: EngineConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                what: format!("engine config {}", path.display()),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.drugs_path = resolve(base, &config.drugs_path);
        config.combos_path = resolve(base, &config.combos_path);
        Ok(config)
    }

    /// Config for a directory holding `drugs.json` and `combos.json`.
    pub fn from_data_dir(dir: &Path, format: SourceFormat) -> Self {
        Self {
            drugs_path: dir.join(DRUGS_FILE),
            combos_path: dir.join(COMBOS_FILE),
            format,
            scoring: None,
        }
    }

    /// Load and validate the reference data.
    pub fn load_reference(&self) -> ConfigResult<ReferenceData> {
        ReferenceData::load(&self.drugs_path, &self.combos_path, self.format)
    }

    /// Load reference data and build an engine with the configured profile.
    pub fn build_engine(&self) -> ConfigResult<TriageEngine> {
        let reference = Arc::new(self.load_reference()?);
        match &self.scoring {
            Some(profile) => TriageEngine::new(reference, profile.clone()),
            None => Ok(TriageEngine::with_default_profile(reference)),
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
