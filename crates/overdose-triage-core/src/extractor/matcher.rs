//! Greedy longest-phrase matching of free text against the catalog.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::reference::Catalog;

use super::normalizer::{is_noise, tokenize, Token};

/// Substances found in a piece of free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Extraction {
    /// Canonical names, in order of first mention, de-duplicated
    pub recognized: Vec<String>,
    /// Unmatched spans as typed, de-duplicated case-insensitively
    pub unknown: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.recognized.is_empty() && self.unknown.is_empty()
    }
}

/// Extracts substance mentions from free text.
pub struct Extractor<'a> {
    catalog: &'a Catalog,
}

impl<'a> Extractor<'a> {
    /// Create a new extractor over a catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Split free text into recognized and unknown substances.
    ///
    /// At each position the longest catalog phrase wins; words that match
    /// nothing and are not connectors or quantities accumulate into an
    /// unknown span, which ends at the next match, connector or separator.
    pub fn extract(&self, text: &str) -> Extraction {
        let tokens = tokenize(text);
        let mut collector = Collector::new(text);

        let mut i = 0;
        while i < tokens.len() {
            if tokens[i].after_separator {
                collector.close_span();
            }

            if let Some((name, len)) = self.longest_match(&tokens[i..]) {
                collector.close_span();
                collector.recognize(name);
                i += len;
                continue;
            }

            let token = &tokens[i];
            if is_noise(&token.normalized) {
                collector.close_span();
            } else {
                collector.extend_span(token);
            }
            i += 1;
        }
        collector.close_span();

        collector.finish()
    }

    /// Longest catalog phrase starting at the first token, as
    /// (canonical name, tokens consumed). Phrases never cross a separator.
    fn longest_match(&self, tokens: &[Token<'_>]) -> Option<(&'a str, usize)> {
        let mut limit = tokens.len().min(self.catalog.max_phrase_len());
        if let Some(pos) = tokens[1..limit.max(1)].iter().position(|t| t.after_separator) {
            limit = pos + 1;
        }

        (1..=limit).rev().find_map(|len| {
            let phrase = tokens[..len]
                .iter()
                .map(|t| t.normalized.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            self.catalog
                .lookup_normalized(&phrase)
                .map(|entry| (entry.name.as_str(), len))
        })
    }
}

/// Accumulates matches and unknown spans with de-duplication.
struct Collector<'t> {
    text: &'t str,
    span: Option<(usize, usize)>,
    recognized: Vec<String>,
    unknown: Vec<String>,
    seen_unknown: HashSet<String>,
}

impl<'t> Collector<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            span: None,
            recognized: Vec::new(),
            unknown: Vec::new(),
            seen_unknown: HashSet::new(),
        }
    }

    fn recognize(&mut self, name: &str) {
        if !self.recognized.iter().any(|r| r == name) {
            self.recognized.push(name.to_string());
        }
    }

    fn extend_span(&mut self, token: &Token<'_>) {
        self.span = match self.span {
            Some((start, _)) => Some((start, token.end)),
            None => Some((token.start, token.end)),
        };
    }

    fn close_span(&mut self) {
        let Some((start, end)) = self.span.take() else {
            return;
        };
        let verbatim = self.text[start..end].trim();
        if verbatim.is_empty() {
            return;
        }
        if self.seen_unknown.insert(verbatim.to_lowercase()) {
            self.unknown.push(verbatim.to_string());
        }
    }

    fn finish(self) -> Extraction {
        Extraction {
            recognized: self.recognized,
            unknown: self.unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogEntry, Category};

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry::new("heroin", Category::Opioid, 4.0).with_aliases(["smack"]),
            CatalogEntry::new("methamphetamine", Category::Stimulant, 2.5)
                .with_aliases(["meth", "crystal meth"]),
            CatalogEntry::new("methadone", Category::Opioid, 3.5),
            CatalogEntry::new("alcohol", Category::Depressant, 3.0).with_aliases(["booze"]),
            CatalogEntry::new("pregabalin", Category::Gabapentinoid, 2.0)
                .with_aliases(["lyrica"]),
            CatalogEntry::new("nitrous oxide", Category::Dissociative, 1.0)
                .with_aliases(["nos", "laughing gas"]),
        ])
        .unwrap()
    }

    fn extract(text: &str) -> Extraction {
        let catalog = catalog();
        Extractor::new(&catalog).extract(text)
    }

    #[test]
    fn test_connectors_and_punctuation() {
        let result = extract("Heroin and ALCOHOL, with lyrica!");
        assert_eq!(result.recognized, vec!["heroin", "alcohol", "pregabalin"]);
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(extract("").is_empty());
        assert!(extract("   ,, ;").is_empty());
    }

    #[test]
    fn test_longest_phrase_wins() {
        let result = extract("crystal meth and laughing gas");
        assert_eq!(result.recognized, vec!["methamphetamine", "nitrous oxide"]);
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn test_meth_not_matched_inside_methadone() {
        let result = extract("methadone");
        assert_eq!(result.recognized, vec!["methadone"]);

        let result = extract("meth and methadone");
        assert_eq!(result.recognized, vec!["methamphetamine", "methadone"]);
    }

    #[test]
    fn test_duplicates_collapsed() {
        let result = extract("heroin, smack, HEROIN");
        assert_eq!(result.recognized, vec!["heroin"]);
    }

    #[test]
    fn test_unknown_spans_verbatim() {
        let result = extract("heroin with Blue Dolphins and xyzstuff");
        assert_eq!(result.recognized, vec!["heroin"]);
        assert_eq!(result.unknown, vec!["Blue Dolphins", "xyzstuff"]);
    }

    #[test]
    fn test_separator_splits_unknown_spans() {
        let result = extract("xyz, abc");
        assert_eq!(result.unknown, vec!["xyz", "abc"]);
    }

    #[test]
    fn test_unknown_dedup_case_insensitive_keeps_first_spelling() {
        let result = extract("Zopiclone; zopiclone, ZOPICLONE");
        assert_eq!(result.unknown, vec!["Zopiclone"]);
    }

    #[test]
    fn test_quantities_are_ignored() {
        let result = extract("2 bags heroin, 10mg lyrica and 0.5g xyzstuff");
        assert_eq!(result.recognized, vec!["heroin", "pregabalin"]);
        assert_eq!(result.unknown, vec!["xyzstuff"]);
    }

    #[test]
    fn test_phrase_does_not_cross_separator() {
        let result = extract("crystal, meth");
        assert_eq!(result.recognized, vec!["methamphetamine"]);
        assert_eq!(result.unknown, vec!["crystal"]);
    }

    #[test]
    fn test_possessive_is_not_a_substance() {
        let result = extract("heroin's");
        assert_eq!(result.recognized, vec!["heroin"]);
        assert!(result.unknown.is_empty());

        let result = extract("smack's and my mate's stuff");
        assert_eq!(result.recognized, vec!["heroin"]);
        assert_eq!(result.unknown, vec!["mate's stuff"]);
    }

    #[test]
    fn test_recognized_and_unknown_disjoint() {
        let result = extract("heroin xyz heroin abc alcohol");
        for name in &result.recognized {
            assert!(!result.unknown.iter().any(|u| u.eq_ignore_ascii_case(name)));
        }
        assert_eq!(result.unknown, vec!["xyz", "abc"]);
    }
}
