//! "Did you mean" suggestions for unknown substances.
//!
//! Suggestions are display hints only. An unknown substance is never
//! rewritten into a recognized one.

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::reference::Catalog;

use super::normalizer::normalize_phrase;

/// Minimum similarity for a suggestion to be offered.
const MIN_SIMILARITY: f64 = 0.80;

/// Closest catalog phrase to an unknown substance.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// Canonical name of the suggested entry
    pub name: String,
    /// The name or alias that was closest
    pub matched: String,
    /// Similarity (0.0 - 1.0)
    pub similarity: f64,
}

/// Find the closest catalog name or alias, if any is close enough.
///
/// Ties go to the lexicographically smallest phrase so the result does not
/// depend on hash-map iteration order.
pub fn suggest(catalog: &Catalog, unknown: &str) -> Option<Suggestion> {
    let query = normalize_phrase(unknown);
    if query.is_empty() {
        return None;
    }

    catalog
        .phrases()
        .map(|(phrase, entry)| (fuzzy_match(&query, phrase), phrase, entry))
        .filter(|(similarity, _, _)| *similarity >= MIN_SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0).then_with(|| b.1.cmp(a.1)))
        .map(|(similarity, phrase, entry)| Suggestion {
            name: entry.name.clone(),
            matched: phrase.to_string(),
            similarity,
        })
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler rewards shared prefixes, Levenshtein overall edit distance
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, Category};

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry::new("heroin", Category::Opioid, 4.0),
            CatalogEntry::new("pregabalin", Category::Gabapentinoid, 2.0)
                .with_aliases(["lyrica"]),
            CatalogEntry::new("diazepam", Category::Benzodiazepine, 3.0)
                .with_aliases(["valium"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_typo_suggests_entry() {
        let catalog = catalog();
        let suggestion = suggest(&catalog, "Heorin").unwrap();
        assert_eq!(suggestion.name, "heroin");

        let suggestion = suggest(&catalog, "pregablin").unwrap();
        assert_eq!(suggestion.name, "pregabalin");
    }

    #[test]
    fn test_alias_typo_reports_alias() {
        let catalog = catalog();
        let suggestion = suggest(&catalog, "vallium").unwrap();
        assert_eq!(suggestion.name, "diazepam");
        assert_eq!(suggestion.matched, "valium");
    }

    #[test]
    fn test_unrelated_gets_nothing() {
        let catalog = catalog();
        assert!(suggest(&catalog, "xyzstuff").is_none());
        assert!(suggest(&catalog, "").is_none());
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("heroin", "heroin") > 0.99);
        assert!(fuzzy_match("pregabalin", "pregablin") > 0.85);
        assert!(fuzzy_match("heroin", "diazepam") < 0.5);
    }
}
