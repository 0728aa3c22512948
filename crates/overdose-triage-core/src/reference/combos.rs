//! Known dangerous combination table.

use std::collections::{BTreeSet, HashSet};

use crate::models::ComboEntry;

use super::{Catalog, ConfigError, ConfigResult};

/// Immutable table of known dangerous combinations.
///
/// Members are stored as canonical catalog names. A combo matches when all
/// of its members are present, regardless of anything else present.
#[derive(Debug, Clone, Default)]
pub struct ComboTable {
    entries: Vec<ComboEntry>,
}

impl ComboTable {
    /// An empty table. Valid: the combo component is then always zero.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, resolving members against the catalog.
    ///
    /// Members may be given as canonical names or aliases; they are stored
    /// as canonical names.
    pub fn from_entries(entries: Vec<ComboEntry>, catalog: &Catalog) -> ConfigResult<Self> {
        let mut seen_sets: HashSet<BTreeSet<String>> = HashSet::new();
        let mut resolved = Vec::with_capacity(entries.len());

        for entry in entries {
            let label = entry.label();
            if !entry.severity.is_finite() || entry.severity < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    subject: label,
                    value: entry.severity,
                });
            }

            let mut members: Vec<String> = Vec::with_capacity(entry.members.len());
            for member in &entry.members {
                let canonical = catalog
                    .lookup(member)
                    .ok_or_else(|| ConfigError::UnknownComboMember {
                        combo: label.clone(),
                        member: member.clone(),
                    })?;
                if !members.contains(&canonical.name) {
                    members.push(canonical.name.clone());
                }
            }

            if members.len() < 2 {
                return Err(ConfigError::ComboTooSmall(label));
            }

            let key: BTreeSet<String> = members.iter().cloned().collect();
            if !seen_sets.insert(key) {
                return Err(ConfigError::DuplicateCombo(label));
            }

            resolved.push(ComboEntry {
                members,
                severity: entry.severity,
                note: entry.note,
            });
        }

        Ok(Self { entries: resolved })
    }

    /// Every combo whose members are all in `recognized`, ordered by
    /// descending severity; ties keep definition order.
    pub fn matching_combos<S: AsRef<str>>(&self, recognized: &[S]) -> Vec<&ComboEntry> {
        let present: HashSet<&str> = recognized.iter().map(AsRef::as_ref).collect();

        let mut matches: Vec<&ComboEntry> = self
            .entries
            .iter()
            .filter(|combo| combo.members.iter().all(|m| present.contains(m.as_str())))
            .collect();

        // sort_by is stable, so equal severities stay in definition order
        matches.sort_by(|a, b| b.severity.total_cmp(&a.severity));
        matches
    }

    /// Entries in definition order.
    pub fn entries(&self) -> &[ComboEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
