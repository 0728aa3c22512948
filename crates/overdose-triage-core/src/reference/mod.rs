//! Reference data: substance catalog and known-combination table.
//!
//! Loaded once, validated, then shared read-only by every triage call.

mod catalog;
mod combos;
pub mod tripsit;

pub use catalog::*;
pub use combos::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{CatalogEntry, ComboEntry};

/// Configuration errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: String,
        source: serde_json::Error,
    },

    #[error("Catalog entry #{position} has an empty name")]
    EmptyName { position: usize },

    #[error("Catalog entry '{entry}' has an empty alias")]
    EmptyAlias { entry: String },

    #[error("'{phrase}' on catalog entry '{entry}' contains a list separator and can never match")]
    SeparatorInPhrase { entry: String, phrase: String },

    #[error("Duplicate catalog entry: {0}")]
    DuplicateEntry(String),

    #[error("Alias '{alias}' maps to both '{first}' and '{second}'")]
    AmbiguousAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Invalid weight {value} for '{subject}' (must be finite and non-negative)")]
    InvalidWeight { subject: String, value: f64 },

    #[error("Catalog entry '{0}' has no categories")]
    MissingCategories(String),

    #[error("Combo '{combo}' references unknown substance '{member}'")]
    UnknownComboMember { combo: String, member: String },

    #[error("Combo '{0}' needs at least two distinct substances")]
    ComboTooSmall(String),

    #[error("Duplicate combo: {0}")]
    DuplicateCombo(String),

    #[error("Invalid scoring profile: {0}")]
    InvalidProfile(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// On-disk format of the reference data files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Arrays of [`CatalogEntry`] and [`ComboEntry`]
    #[default]
    Native,
    /// TripSit `drugs.json` / `combos.json`
    Tripsit,
}

/// Validated catalog and combo table, plus a digest identifying them.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    catalog: Catalog,
    combos: ComboTable,
    digest: String,
}

impl ReferenceData {
    /// Bundle an already-validated catalog and combo table.
    pub fn new(catalog: Catalog, combos: ComboTable) -> Self {
        let digest = digest(&catalog, &combos);
        tracing::info!(
            substances = catalog.len(),
            phrases = catalog.phrase_count(),
            combos = combos.len(),
            digest = &digest[..12],
            "reference data loaded"
        );
        Self {
            catalog,
            combos,
            digest,
        }
    }

    /// Build from in-memory entries.
    pub fn from_entries(
        substances: Vec<CatalogEntry>,
        combos: Vec<ComboEntry>,
    ) -> ConfigResult<Self> {
        let catalog = Catalog::from_entries(substances)?;
        let combos = ComboTable::from_entries(combos, &catalog)?;
        Ok(Self::new(catalog, combos))
    }

    /// Parse both sources from JSON text.
    pub fn from_json(
        drugs_json: &str,
        combos_json: &str,
        format: SourceFormat,
    ) -> ConfigResult<Self> {
        match format {
            SourceFormat::Native => {
                let substances: Vec<CatalogEntry> =
                    serde_json::from_str(drugs_json).map_err(|source| ConfigError::Parse {
                        what: "substance catalog".into(),
                        source,
                    })?;
                let combos: Vec<ComboEntry> =
                    serde_json::from_str(combos_json).map_err(|source| ConfigError::Parse {
                        what: "combo table".into(),
                        source,
                    })?;
                Self::from_entries(substances, combos)
            }
            SourceFormat::Tripsit => {
                let catalog = Catalog::from_entries(tripsit::parse_drugs(drugs_json)?)?;
                let combos = tripsit::parse_combos(combos_json, &catalog)?;
                let combos = ComboTable::from_entries(combos, &catalog)?;
                Ok(Self::new(catalog, combos))
            }
        }
    }

    /// Read both sources from disk.
    pub fn load(drugs_path: &Path, combos_path: &Path, format: SourceFormat) -> ConfigResult<Self> {
        let drugs_json = read_source(drugs_path)?;
        let combos_json = read_source(combos_path)?;
        Self::from_json(&drugs_json, &combos_json, format)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn combos(&self) -> &ComboTable {
        &self.combos
    }

    /// Hex SHA-256 over the validated entries.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn read_source(path: &Path) -> ConfigResult<String> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Digest of the validated data, independent of source formatting.
fn digest(catalog: &Catalog, combos: &ComboTable) -> String {
    let mut hasher = Sha256::new();
    for entry in catalog.entries() {
        hasher.update(entry.name.as_bytes());
        hasher.update([0x1f]);
        for alias in &entry.aliases {
            hasher.update(alias.as_bytes());
            hasher.update([0x1e]);
        }
        for category in &entry.categories {
            hasher.update(category.as_str().as_bytes());
            hasher.update([0x1e]);
        }
        hasher.update(entry.base_weight.to_le_bytes());
        hasher.update([0x1d]);
    }
    hasher.update([0x00]);
    for combo in combos.entries() {
        for member in &combo.members {
            hasher.update(member.as_bytes());
            hasher.update([0x1e]);
        }
        hasher.update(combo.severity.to_le_bytes());
        if let Some(note) = &combo.note {
            hasher.update(note.as_bytes());
        }
        hasher.update([0x1d]);
    }
    hex::encode(hasher.finalize())
}
