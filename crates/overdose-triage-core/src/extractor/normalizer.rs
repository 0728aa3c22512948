//! Text normalization and tokenization.
//!
//! Handles:
//! - Case folding and punctuation stripping (internal hyphens survive,
//!   apostrophes are dropped and a possessive "'s" is removed)
//! - List separators that split unknown spans (`,` `;` `/` `+` `&`, newlines)
//! - Connector and quantity detection ("and", "with", "10mg", "3 pills")

/// Characters that end a list item.
const SEPARATORS: &[char] = &[',', ';', '/', '+', '&', '|', '\n', '\r'];

/// Straight and typographic apostrophes.
const APOSTROPHES: &[char] = &['\'', '\u{2019}'];

/// Connectors and filler words that never form part of a substance name.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "also", "an", "and", "around", "at", "before", "bit", "but",
    "couple", "drank", "drinking", "few", "had", "has", "have", "he", "her", "his", "i",
    "in", "injected", "is", "it", "last", "little", "lot", "lots", "maybe", "me", "mixed",
    "my", "night", "of", "on", "or", "plus", "possibly", "she", "smoked", "snorted", "some",
    "than", "that", "the", "their", "them", "then", "they", "this", "today", "together",
    "took", "taken", "taking", "too", "using", "used", "uses", "w", "was", "were",
    "with", "yesterday",
];

/// Dose and quantity units; a number followed by one of these is noise.
const UNITS: &[&str] = &[
    // Volume
    "cc", "ml", "l", "liter", "liters", "litre", "litres",
    // Mass
    "mcg", "microgram", "micrograms", "µg", "ug", "mg", "g", "gram", "grams", "kg",
    // Units
    "unit", "units", "iu",
    // Tablets/capsules
    "tab", "tabs", "tablet", "tablets", "cap", "caps", "capsule", "capsules", "pill",
    "pills",
    // Street and drink measures
    "bag", "bags", "point", "points", "line", "lines", "dose", "doses", "drink", "drinks",
    "pint", "pints", "can", "cans", "bottle", "bottles", "x",
];

/// One word of input with its position in the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    /// Original slice, case preserved
    pub text: &'a str,
    /// Lowercased form used for matching
    pub normalized: String,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// A list separator appeared between this token and the previous one
    pub after_separator: bool,
}

/// Split text into word tokens.
///
/// A word is a run of alphanumeric characters, hyphens and apostrophes with
/// leading and trailing hyphens and apostrophes removed, so "co-codamol"
/// stays whole while " - " is treated as a separator. "heroin's" yields the
/// single word "heroin".
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pending_separator = false;
    let mut run_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_alphanumeric() || ch == '-' || APOSTROPHES.contains(&ch) {
            if run_start.is_none() {
                run_start = Some(idx);
            }
            continue;
        }
        if let Some(start) = run_start.take() {
            push_word(text, start, idx, &mut pending_separator, &mut tokens);
        }
        if SEPARATORS.contains(&ch) {
            pending_separator = true;
        }
    }
    if let Some(start) = run_start {
        push_word(text, start, text.len(), &mut pending_separator, &mut tokens);
    }

    tokens
}

fn push_word<'a>(
    text: &'a str,
    start: usize,
    end: usize,
    pending_separator: &mut bool,
    tokens: &mut Vec<Token<'a>>,
) {
    let raw = &text[start..end];
    let word = strip_possessive(raw.trim_matches(is_word_edge));
    if word.is_empty() {
        *pending_separator = true;
        return;
    }
    let offset = start + (raw.len() - raw.trim_start_matches(is_word_edge).len());
    let normalized: String = word
        .chars()
        .filter(|c| !APOSTROPHES.contains(c))
        .collect();
    tokens.push(Token {
        text: &text[offset..offset + word.len()],
        normalized: normalized.to_lowercase(),
        start: offset,
        end: offset + word.len(),
        after_separator: std::mem::take(pending_separator),
    });
}

fn is_word_edge(ch: char) -> bool {
    ch == '-' || APOSTROPHES.contains(&ch)
}

/// Drop a trailing "'s". A word that is nothing but the suffix is kept.
fn strip_possessive(word: &str) -> &str {
    let Some(stem) = word.strip_suffix(['s', 'S']) else {
        return word;
    };
    match stem.strip_suffix(APOSTROPHES) {
        Some(stem) => match stem.trim_end_matches(is_word_edge) {
            "" => word,
            stem => stem,
        },
        None => word,
    }
}

/// Normalize a phrase to its matching key: lowercase words joined by single
/// spaces, punctuation other than internal hyphens removed.
pub fn normalize_phrase(phrase: &str) -> String {
    tokenize(phrase)
        .into_iter()
        .map(|t| t.normalized)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether a list separator splits the phrase into more than one item.
///
/// Such a phrase can never be matched in free text, since matching stops at
/// separators.
pub fn has_separator(phrase: &str) -> bool {
    tokenize(phrase).iter().skip(1).any(|t| t.after_separator)
}

/// Check whether a normalized token is a connector or filler word.
pub fn is_stop_word(normalized: &str) -> bool {
    STOP_WORDS.contains(&normalized)
}

/// Check whether a normalized token is a bare quantity ("10", "10mg", "0",
/// "5ml") or a unit on its own ("mg", "pills").
pub fn is_quantity(normalized: &str) -> bool {
    let unit = normalized.trim_start_matches(|c: char| c.is_ascii_digit());
    let has_digits = unit.len() < normalized.len();
    if unit.is_empty() {
        return has_digits;
    }
    UNITS.contains(&unit)
}

/// Tokens that can be skipped when building unknown spans.
pub fn is_noise(normalized: &str) -> bool {
    is_stop_word(normalized) || is_quantity(normalized)
}
