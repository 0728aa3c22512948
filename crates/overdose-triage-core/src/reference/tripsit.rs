//! Import of TripSit-format `drugs.json` and `combos.json`.
//!
//! TripSit data carries no risk weights, so base weights come from
//! [`Category::default_base_weight`] and combo severities from
//! [`ComboStatus::severity`].

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::extractor::{has_separator, normalize_phrase};
use crate::models::{CatalogEntry, Category, ComboEntry, ComboStatus};

use super::{Catalog, ConfigError, ConfigResult};

#[derive(Debug, Deserialize)]
struct TripSitDrug {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TripSitCombo {
    status: String,
    #[serde(default)]
    note: Option<String>,
}

/// Map a TripSit category label onto the fixed category set.
fn map_category(label: &str) -> Option<Category> {
    match label.trim().to_lowercase().as_str() {
        "opioid" => Some(Category::Opioid),
        "benzodiazepine" => Some(Category::Benzodiazepine),
        "depressant" | "barbiturate" => Some(Category::Depressant),
        "gabapentinoid" => Some(Category::Gabapentinoid),
        "stimulant" => Some(Category::Stimulant),
        "empathogen" | "entactogen" => Some(Category::Empathogen),
        "dissociative" => Some(Category::Dissociative),
        "psychedelic" => Some(Category::Psychedelic),
        "deliriant" => Some(Category::Deliriant),
        "cannabinoid" => Some(Category::Cannabinoid),
        _ => None,
    }
}

/// Map a TripSit combo group key ("opioids") onto a category.
fn map_group(key: &str) -> Option<Category> {
    match key.trim().to_lowercase().as_str() {
        "opioids" => Some(Category::Opioid),
        "benzodiazepines" | "benzos" => Some(Category::Benzodiazepine),
        "gabapentinoids" => Some(Category::Gabapentinoid),
        _ => None,
    }
}

/// Parse TripSit `drugs.json` into catalog entries.
///
/// Aliases claimed by more than one drug stay with the first drug in key
/// order and are dropped from the others with a warning.
pub fn parse_drugs(json: &str) -> ConfigResult<Vec<CatalogEntry>> {
    let raw: BTreeMap<String, TripSitDrug> =
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            what: "TripSit drugs".into(),
            source,
        })?;

    // Canonical names claim their phrase before any alias does.
    let mut owners: HashMap<String, String> = HashMap::new();
    let named: Vec<(String, TripSitDrug)> = raw
        .into_iter()
        .map(|(key, drug)| {
            let name = drug
                .name
                .clone()
                .filter(|n| !n.trim().is_empty() && !has_separator(n))
                .unwrap_or(key);
            (name, drug)
        })
        .collect();
    for (name, _) in &named {
        owners
            .entry(normalize_phrase(name))
            .or_insert_with(|| name.clone());
    }

    let mut entries = Vec::with_capacity(named.len());
    for (name, drug) in named {
        let mut categories: Vec<Category> =
            drug.categories.iter().filter_map(|c| map_category(c)).collect();
        categories.sort();
        categories.dedup();
        if categories.is_empty() {
            categories.push(Category::Other);
        }
        let base_weight = categories
            .iter()
            .map(Category::default_base_weight)
            .fold(0.0, f64::max);

        let mut aliases = Vec::new();
        for alias in drug.aliases {
            let key = normalize_phrase(&alias);
            if key.is_empty() {
                continue;
            }
            if has_separator(&alias) {
                tracing::warn!(
                    alias = %alias,
                    drug = %name,
                    "TripSit alias with list separator dropped"
                );
                continue;
            }
            let owner = owners.entry(key).or_insert_with(|| name.clone());
            if *owner == name {
                aliases.push(alias);
            } else {
                tracing::warn!(
                    alias = %alias,
                    kept_by = %owner,
                    dropped_from = %name,
                    "ambiguous TripSit alias dropped"
                );
            }
        }

        entries.push(CatalogEntry {
            name,
            aliases,
            categories,
            base_weight,
        });
    }

    Ok(entries)
}

/// Resolve a TripSit combo key to canonical catalog names.
fn resolve_key(key: &str, catalog: &Catalog) -> Vec<String> {
    if let Some(entry) = catalog.lookup(key) {
        return vec![entry.name.clone()];
    }
    match map_group(key) {
        Some(category) => catalog
            .entries_in(category)
            .map(|entry| entry.name.clone())
            .collect(),
        None => {
            tracing::debug!(key, "TripSit combo key not in catalog, skipped");
            Vec::new()
        }
    }
}

/// Parse TripSit `combos.json` into combo entries against a catalog.
///
/// Only statuses with a positive severity become combos. The matrix lists
/// each pair twice; mirror pairs collapse into one combo keeping the higher
/// severity.
pub fn parse_combos(json: &str, catalog: &Catalog) -> ConfigResult<Vec<ComboEntry>> {
    let raw: BTreeMap<String, BTreeMap<String, TripSitCombo>> =
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            what: "TripSit combos".into(),
            source,
        })?;

    let mut pairs: BTreeMap<(String, String), (f64, Option<String>)> = BTreeMap::new();
    for (first_key, row) in &raw {
        let firsts = resolve_key(first_key, catalog);
        if firsts.is_empty() {
            continue;
        }
        for (second_key, combo) in row {
            let Some(status) = ComboStatus::parse(&combo.status) else {
                tracing::debug!(status = %combo.status, "unrecognized TripSit status, skipped");
                continue;
            };
            let severity = status.severity();
            if severity <= 0.0 {
                continue;
            }
            for second in resolve_key(second_key, catalog) {
                for first in &firsts {
                    if *first == second {
                        continue;
                    }
                    let key = if *first < second {
                        (first.clone(), second.clone())
                    } else {
                        (second.clone(), first.clone())
                    };
                    let slot = pairs.entry(key).or_insert((0.0, None));
                    if severity > slot.0 {
                        *slot = (severity, combo.note.clone());
                    }
                }
            }
        }
    }

    Ok(pairs
        .into_iter()
        .map(|((a, b), (severity, note))| ComboEntry {
            members: vec![a, b],
            severity,
            note,
        })
        .collect())
}
