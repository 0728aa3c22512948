//! Drug score: base weights, category synergy and known combinations.

use std::collections::BTreeSet;

use crate::models::{Category, DrugScore, SynergyPair};
use crate::reference::ReferenceData;

use super::InteractionTable;

/// Scores a set of recognized substances.
pub struct DrugScorer<'a> {
    reference: &'a ReferenceData,
    interactions: &'a InteractionTable,
}

impl<'a> DrugScorer<'a> {
    /// Create a new drug scorer.
    pub fn new(reference: &'a ReferenceData, interactions: &'a InteractionTable) -> Self {
        Self {
            reference,
            interactions,
        }
    }

    /// Score recognized canonical names. Names missing from the catalog
    /// contribute nothing.
    pub fn score(&self, recognized: &[String]) -> DrugScore {
        let base = self.base_component(recognized);
        let synergy_pairs = self.synergy_pairs(recognized);
        let synergy: f64 = synergy_pairs.iter().map(|p| p.weight).sum();

        let matched_combos: Vec<_> = self
            .reference
            .combos()
            .matching_combos(recognized)
            .into_iter()
            .cloned()
            .collect();
        let combo: f64 = matched_combos.iter().map(|c| c.severity).sum();

        DrugScore {
            base,
            synergy,
            combo,
            total: base + synergy + combo,
            synergy_pairs,
            matched_combos,
        }
    }

    fn base_component(&self, recognized: &[String]) -> f64 {
        recognized
            .iter()
            .filter_map(|name| self.reference.catalog().lookup(name))
            .map(|entry| entry.base_weight)
            .sum()
    }

    /// Category pairs carried by two distinct substances.
    ///
    /// A substance in both opioid and depressant categories does not pair
    /// with itself; the pair only counts once a second substance supplies one
    /// side of it. Each unordered pair counts once.
    fn synergy_pairs(&self, recognized: &[String]) -> Vec<SynergyPair> {
        let catalog = self.reference.catalog();
        let per_substance: Vec<&[Category]> = recognized
            .iter()
            .filter_map(|name| catalog.lookup(name))
            .map(|entry| entry.categories.as_slice())
            .collect();

        let mut pairs: BTreeSet<(Category, Category)> = BTreeSet::new();
        for (i, first) in per_substance.iter().enumerate() {
            for second in &per_substance[i + 1..] {
                for &a in first.iter() {
                    for &b in second.iter() {
                        if a != b {
                            pairs.insert((a.min(b), a.max(b)));
                        }
                    }
                }
            }
        }

        pairs
            .into_iter()
            .map(|(first, second)| SynergyPair {
                first,
                second,
                weight: self.interactions.weight(first, second),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, ComboEntry};

    fn reference() -> ReferenceData {
        ReferenceData::from_entries(
            vec![
                CatalogEntry::new("heroin", Category::Opioid, 4.0),
                CatalogEntry::new("alcohol", Category::Depressant, 3.0),
                CatalogEntry::new("cocaine", Category::Stimulant, 2.0),
                CatalogEntry::new("paracetamol", Category::Analgesic, 1.0),
                CatalogEntry::new("tramadol", Category::Opioid, 3.0)
                    .with_category(Category::Depressant),
            ],
            vec![ComboEntry::new(["heroin", "alcohol"], 4.0)],
        )
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_substance_has_no_synergy() {
        let reference = reference();
        let table = InteractionTable::default();
        let score = DrugScorer::new(&reference, &table).score(&names(&["paracetamol"]));

        assert_eq!(score.base, 1.0);
        assert_eq!(score.synergy, 0.0);
        assert_eq!(score.combo, 0.0);
        assert_eq!(score.total, 1.0);
    }

    #[test]
    fn test_multi_category_substance_does_not_self_pair() {
        let reference = reference();
        let table = InteractionTable::default();
        let score = DrugScorer::new(&reference, &table).score(&names(&["tramadol"]));
        assert_eq!(score.synergy, 0.0);
        assert!(score.synergy_pairs.is_empty());
    }

    #[test]
    fn test_heroin_alcohol() {
        let reference = reference();
        let table = InteractionTable::default();
        let score = DrugScorer::new(&reference, &table).score(&names(&["heroin", "alcohol"]));

        assert_eq!(score.base, 7.0);
        assert_eq!(score.synergy, 4.0);
        assert_eq!(score.combo, 4.0);
        assert_eq!(score.total, 15.0);
        assert_eq!(score.matched_combos.len(), 1);
        assert_eq!(
            score.synergy_pairs,
            vec![SynergyPair {
                first: Category::Opioid,
                second: Category::Depressant,
                weight: 4.0,
            }]
        );
    }

    #[test]
    fn test_pair_counted_once_across_substances() {
        let reference = reference();
        let table = InteractionTable::default();
        // heroin (opioid) + tramadol (opioid, depressant) + alcohol (depressant):
        // only the opioid/depressant pair exists, counted once
        let score = DrugScorer::new(&reference, &table)
            .score(&names(&["heroin", "tramadol", "alcohol"]));
        assert_eq!(score.synergy_pairs.len(), 1);
        assert_eq!(score.synergy, 4.0);
    }

    #[test]
    fn test_synergy_order_independent() {
        let reference = reference();
        let table = InteractionTable::default();
        let scorer = DrugScorer::new(&reference, &table);
        let forward = scorer.score(&names(&["cocaine", "heroin", "alcohol"]));
        let backward = scorer.score(&names(&["alcohol", "heroin", "cocaine"]));
        assert_eq!(forward.synergy, backward.synergy);
        assert_eq!(forward.synergy_pairs, backward.synergy_pairs);
        assert_eq!(forward.total, backward.total);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let reference = reference();
        let table = InteractionTable::default();
        let score = DrugScorer::new(&reference, &table).score(&[]);
        assert_eq!(score, DrugScore::default());
    }
}
