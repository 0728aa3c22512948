//! Substance catalog models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pharmacological category a substance belongs to.
///
/// Declaration order is the canonical ordering used when category pairs are
/// reported, so `(Opioid, Depressant)` and `(Depressant, Opioid)` collapse to
/// the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Opioid,
    Benzodiazepine,
    Depressant,
    Gabapentinoid,
    Stimulant,
    Empathogen,
    Dissociative,
    Psychedelic,
    Deliriant,
    Cannabinoid,
    Analgesic,
    Other,
}

impl Category {
    /// All categories, in canonical order.
    pub const ALL: [Category; 12] = [
        Category::Opioid,
        Category::Benzodiazepine,
        Category::Depressant,
        Category::Gabapentinoid,
        Category::Stimulant,
        Category::Empathogen,
        Category::Dissociative,
        Category::Psychedelic,
        Category::Deliriant,
        Category::Cannabinoid,
        Category::Analgesic,
        Category::Other,
    ];

    /// Lowercase identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Opioid => "opioid",
            Category::Benzodiazepine => "benzodiazepine",
            Category::Depressant => "depressant",
            Category::Gabapentinoid => "gabapentinoid",
            Category::Stimulant => "stimulant",
            Category::Empathogen => "empathogen",
            Category::Dissociative => "dissociative",
            Category::Psychedelic => "psychedelic",
            Category::Deliriant => "deliriant",
            Category::Cannabinoid => "cannabinoid",
            Category::Analgesic => "analgesic",
            Category::Other => "other",
        }
    }

    /// Whether the category suppresses breathing or consciousness.
    pub fn is_cns_depressant(&self) -> bool {
        matches!(
            self,
            Category::Opioid
                | Category::Benzodiazepine
                | Category::Depressant
                | Category::Gabapentinoid
        )
    }

    /// Base acute-risk weight used when a source gives none (TripSit import).
    pub fn default_base_weight(&self) -> f64 {
        match self {
            Category::Opioid => 4.0,
            Category::Benzodiazepine | Category::Depressant => 3.0,
            Category::Gabapentinoid
            | Category::Stimulant
            | Category::Empathogen
            | Category::Dissociative
            | Category::Deliriant => 2.0,
            Category::Psychedelic | Category::Cannabinoid | Category::Analgesic => 1.0,
            Category::Other => 0.5,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single known substance in the reference catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    /// Canonical name - unique key
    pub name: String,
    /// Alternative names, brand names and street names
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Pharmacological categories (at least one)
    pub categories: Vec<Category>,
    /// Base acute-risk weight
    pub base_weight: f64,
}

impl CatalogEntry {
    /// Create a new entry with a single category and no aliases.
    pub fn new(name: impl Into<String>, category: Category, base_weight: f64) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            categories: vec![category],
            base_weight,
        }
    }

    /// Builder-style alias addition.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Builder-style extra category.
    pub fn with_category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Check membership of a category.
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// Whether any of this entry's categories is a CNS depressant.
    pub fn is_cns_depressant(&self) -> bool {
        self.categories.iter().any(Category::is_cns_depressant)
    }
}
