//! Known dangerous combination models.

use serde::{Deserialize, Serialize};

/// A documented dangerous co-occurrence of specific substances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComboEntry {
    /// Canonical names of the member substances (two or more, order irrelevant)
    pub members: Vec<String>,
    /// Severity weight added to the drug score when the combo fires
    pub severity: f64,
    /// Free-text explanation of the interaction
    #[serde(default)]
    pub note: Option<String>,
}

impl ComboEntry {
    /// Create a new combo entry.
    pub fn new<I, S>(members: I, severity: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: members.into_iter().map(Into::into).collect(),
            severity,
            note: None,
        }
    }

    /// Builder-style note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Human-readable member list, e.g. "heroin + alcohol".
    pub fn label(&self) -> String {
        self.members.join(" + ")
    }
}

/// TripSit interaction status, as used in TripSit `combos.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboStatus {
    Dangerous,
    Unsafe,
    Caution,
    LowRiskSynergy,
    LowRiskNoSynergy,
    LowRiskDecrease,
}

impl ComboStatus {
    /// Parse a TripSit status label (case-insensitive).
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "dangerous" => Some(ComboStatus::Dangerous),
            "unsafe" => Some(ComboStatus::Unsafe),
            "caution" => Some(ComboStatus::Caution),
            "low risk & synergy" => Some(ComboStatus::LowRiskSynergy),
            "low risk & no synergy" => Some(ComboStatus::LowRiskNoSynergy),
            "low risk & decrease" => Some(ComboStatus::LowRiskDecrease),
            _ => None,
        }
    }

    /// Severity weight for this status. Zero means "not a dangerous combo".
    pub fn severity(&self) -> f64 {
        match self {
            ComboStatus::Dangerous => 4.0,
            ComboStatus::Unsafe => 3.0,
            ComboStatus::Caution => 1.5,
            ComboStatus::LowRiskSynergy => 0.5,
            ComboStatus::LowRiskNoSynergy | ComboStatus::LowRiskDecrease => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let combo = ComboEntry::new(["heroin", "alcohol"], 4.0);
        assert_eq!(combo.label(), "heroin + alcohol");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ComboStatus::parse("Dangerous"), Some(ComboStatus::Dangerous));
        assert_eq!(
            ComboStatus::parse("Low Risk & Synergy"),
            Some(ComboStatus::LowRiskSynergy)
        );
        assert_eq!(ComboStatus::parse("  unsafe "), Some(ComboStatus::Unsafe));
        assert_eq!(ComboStatus::parse("Serotonin Syndrome"), None);
    }

    #[test]
    fn test_status_severity_ordering() {
        assert!(ComboStatus::Dangerous.severity() > ComboStatus::Unsafe.severity());
        assert!(ComboStatus::Unsafe.severity() > ComboStatus::Caution.severity());
        assert!(ComboStatus::Caution.severity() > ComboStatus::LowRiskSynergy.severity());
        assert_eq!(ComboStatus::LowRiskDecrease.severity(), 0.0);
    }

    #[test]
    fn test_note_optional_in_json() {
        let combo: ComboEntry =
            serde_json::from_str(r#"{"members": ["a", "b"], "severity": 1.0}"#).unwrap();
        assert_eq!(combo.note, None);
    }
}
