//! Substance catalog with a precomputed alias index.

use std::collections::{BTreeSet, HashMap};

use crate::extractor::{has_separator, normalize_phrase};
use crate::models::{CatalogEntry, Category};

use super::{ConfigError, ConfigResult};

/// Immutable substance catalog.
///
/// Every canonical name and alias is indexed by its normalized phrase
/// (lowercase words joined by single spaces), so lookups are
/// case-insensitive and multi-word aliases match as whole phrases.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// normalized phrase → index into `entries`
    index: HashMap<String, usize>,
    /// Longest indexed phrase, in words
    max_phrase_len: usize,
}

impl Catalog {
    /// Build a catalog, validating every invariant.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> ConfigResult<Self> {
        let mut catalog = Self {
            entries: Vec::with_capacity(entries.len()),
            index: HashMap::new(),
            max_phrase_len: 0,
        };

        // Canonical names first, so an alias that shadows another entry's
        // name is caught regardless of definition order.
        for (position, mut entry) in entries.into_iter().enumerate() {
            entry.name = entry.name.trim().to_string();
            let key = normalize_phrase(&entry.name);
            if key.is_empty() {
                return Err(ConfigError::EmptyName { position });
            }
            if has_separator(&entry.name) {
                return Err(ConfigError::SeparatorInPhrase {
                    phrase: entry.name.clone(),
                    entry: entry.name,
                });
            }
            if catalog.index.contains_key(&key) {
                return Err(ConfigError::DuplicateEntry(entry.name));
            }
            if entry.categories.is_empty() {
                return Err(ConfigError::MissingCategories(entry.name));
            }
            if !entry.base_weight.is_finite() || entry.base_weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    subject: entry.name,
                    value: entry.base_weight,
                });
            }
            let mut seen = BTreeSet::new();
            entry.categories.retain(|c| seen.insert(*c));

            catalog.insert_key(key, catalog.entries.len());
            catalog.entries.push(entry);
        }

        for idx in 0..catalog.entries.len() {
            for alias in catalog.entries[idx].aliases.clone() {
                let key = normalize_phrase(&alias);
                if key.is_empty() {
                    return Err(ConfigError::EmptyAlias {
                        entry: catalog.entries[idx].name.clone(),
                    });
                }
                if has_separator(&alias) {
                    return Err(ConfigError::SeparatorInPhrase {
                        entry: catalog.entries[idx].name.clone(),
                        phrase: alias,
                    });
                }
                match catalog.index.get(&key) {
                    Some(&owner) if owner == idx => {}
                    Some(&owner) => {
                        return Err(ConfigError::AmbiguousAlias {
                            alias,
                            first: catalog.entries[owner].name.clone(),
                            second: catalog.entries[idx].name.clone(),
                        });
                    }
                    None => catalog.insert_key(key, idx),
                }
            }
        }

        Ok(catalog)
    }

    fn insert_key(&mut self, key: String, idx: usize) {
        let words = key.split(' ').count();
        self.max_phrase_len = self.max_phrase_len.max(words);
        self.index.insert(key, idx);
    }

    /// Look up a token or phrase by canonical name or alias.
    pub fn lookup(&self, token: &str) -> Option<&CatalogEntry> {
        self.lookup_normalized(&normalize_phrase(token))
    }

    /// Look up an already-normalized phrase.
    pub fn lookup_normalized(&self, phrase: &str) -> Option<&CatalogEntry> {
        self.index.get(phrase).map(|&idx| &self.entries[idx])
    }

    /// Union of the categories of the named substances. Names that are not in
    /// the catalog are ignored.
    pub fn all_categories_for<I, S>(&self, names: I) -> BTreeSet<Category>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| self.lookup(name.as_ref()))
            .flat_map(|entry| entry.categories.iter().copied())
            .collect()
    }

    /// All indexed phrases with their owning entry.
    pub fn phrases(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.index
            .iter()
            .map(|(phrase, &idx)| (phrase.as_str(), &self.entries[idx]))
    }

    /// Entries in definition order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries that belong to a category, in definition order.
    pub fn entries_in(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.has_category(category))
    }

    /// Longest alias, in words.
    pub fn max_phrase_len(&self) -> usize {
        self.max_phrase_len
    }

    /// Number of indexed phrases (names plus aliases).
    pub fn phrase_count(&self) -> usize {
        self.index.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
