//! Triage output models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::Category;
use super::combo::ComboEntry;

/// Discrete acute-risk tier derived from the total score.
///
/// Variants are declared in ascending severity so the derived `Ord` gives
/// "is at least as severe as" comparisons directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBranch {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskBranch {
    /// All branches in ascending severity.
    pub const ALL: [RiskBranch; 4] = [
        RiskBranch::Low,
        RiskBranch::Moderate,
        RiskBranch::High,
        RiskBranch::Critical,
    ];

    /// Short pathway description shown next to the branch name.
    pub fn pathway(&self) -> &'static str {
        match self {
            RiskBranch::Low => "brief advice and harm-reduction information",
            RiskBranch::Moderate => "harm-reduction intervention and follow-up",
            RiskBranch::High => "same-day specialist assessment",
            RiskBranch::Critical => "emergency response",
        }
    }

    /// Referral priority, monotonic with branch severity.
    pub fn priority(&self) -> ReferralPriority {
        match self {
            RiskBranch::Low => ReferralPriority::Routine,
            RiskBranch::Moderate => ReferralPriority::Soon,
            RiskBranch::High => ReferralPriority::Urgent,
            RiskBranch::Critical => ReferralPriority::Emergency,
        }
    }
}

impl fmt::Display for RiskBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBranch::Low => write!(f, "Low"),
            RiskBranch::Moderate => write!(f, "Moderate"),
            RiskBranch::High => write!(f, "High"),
            RiskBranch::Critical => write!(f, "Critical"),
        }
    }
}

/// How quickly a referral should be actioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralPriority {
    Routine,
    Soon,
    Urgent,
    Emergency,
}

impl fmt::Display for ReferralPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferralPriority::Routine => write!(f, "Routine"),
            ReferralPriority::Soon => write!(f, "Soon (within 7 days)"),
            ReferralPriority::Urgent => write!(f, "Urgent (same day)"),
            ReferralPriority::Emergency => write!(f, "Emergency (immediate)"),
        }
    }
}

/// Service a referral is directed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralService {
    HarmReductionInformation,
    CommunityDrugService,
    SpecialistSubstanceTeam,
    EmergencyServices,
}

impl fmt::Display for ReferralService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferralService::HarmReductionInformation => {
                write!(f, "Harm-reduction information and self-referral details")
            }
            ReferralService::CommunityDrugService => {
                write!(f, "Community drug and alcohol service")
            }
            ReferralService::SpecialistSubstanceTeam => {
                write!(f, "Specialist substance use team (same-day assessment)")
            }
            ReferralService::EmergencyServices => {
                write!(f, "Emergency services / emergency department")
            }
        }
    }
}

/// Person-level vulnerability factor that contributes to the context score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    OpioidDependence,
    UnstableHousing,
    RecentOverdose,
    SevereMentalHealth,
    PolysubstanceHistory,
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFactor::OpioidDependence => write!(f, "known or suspected opioid dependence"),
            RiskFactor::UnstableHousing => write!(f, "homeless or unstable housing"),
            RiskFactor::RecentOverdose => write!(f, "recent non-fatal overdose"),
            RiskFactor::SevereMentalHealth => write!(f, "severe mental health difficulty"),
            RiskFactor::PolysubstanceHistory => write!(f, "history of polysubstance use"),
        }
    }
}

/// Interaction between two categories that fired during scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynergyPair {
    /// Lower category in canonical order
    pub first: Category,
    /// Higher category in canonical order
    pub second: Category,
    /// Interaction weight added
    pub weight: f64,
}

/// Drug score with its subcomponents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DrugScore {
    /// Sum of per-substance base weights
    pub base: f64,
    /// Category synergy component
    pub synergy: f64,
    /// Known-combination component
    pub combo: f64,
    /// base + synergy + combo
    pub total: f64,
    /// Category pairs behind the synergy component
    pub synergy_pairs: Vec<SynergyPair>,
    /// Combos behind the combo component, highest severity first
    pub matched_combos: Vec<ComboEntry>,
}

/// A single context factor and the weight it added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextFactor {
    pub factor: RiskFactor,
    pub weight: f64,
}

/// Context vulnerability score with contributing factors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContextScore {
    pub total: f64,
    pub factors: Vec<ContextFactor>,
}

/// Why an alert was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    UnknownSubstance,
    DangerousCombination,
    RecentOverdose,
    LowOpioidTolerance,
    MultipleDepressants,
}

/// Branch-independent warning attached to a result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Referral recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferralDecision {
    /// Whether to refer
    pub refer: bool,
    /// Priority derived from the branch
    pub priority: ReferralPriority,
    /// Templated explanation citing branch and triggering flags
    pub reason: String,
    /// Suggested service for the branch
    pub service: ReferralService,
}

/// Complete output of one triage invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageResult {
    /// Recognized canonical names, in order of first mention
    pub detected_drugs: Vec<String>,
    /// Unmatched spans as typed
    pub unknown_drugs: Vec<String>,
    /// Drug score and subcomponents
    pub drug_score: DrugScore,
    /// Context vulnerability score
    pub context_score: ContextScore,
    /// drug_score.total + context_score.total
    pub total_score: f64,
    /// Risk branch for the total score
    pub branch: RiskBranch,
    /// Recommended interventions for the branch
    pub interventions: Vec<String>,
    /// Additional alerts, independent of branch
    pub alerts: Vec<Alert>,
    /// Referral recommendation
    pub referral: ReferralDecision,
    /// SHA-256 digest of the reference data that produced this result
    pub reference_digest: String,
}

impl TriageResult {
    /// Check for an alert of a given kind.
    pub fn has_alert(&self, kind: AlertKind) -> bool {
        self.alerts.iter().any(|a| a.kind == kind)
    }

    /// Alerts rendered as plain strings.
    pub fn alert_messages(&self) -> Vec<String> {
        self.alerts.iter().map(|a| a.message.clone()).collect()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_ordering() {
        assert!(RiskBranch::Low < RiskBranch::Moderate);
        assert!(RiskBranch::Moderate < RiskBranch::High);
        assert!(RiskBranch::High < RiskBranch::Critical);

        let mut sorted = RiskBranch::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, RiskBranch::ALL.to_vec());
    }

    #[test]
    fn test_priority_monotonic_with_branch() {
        for pair in RiskBranch::ALL.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
        }
    }

    #[test]
    fn test_branch_serde() {
        let json = serde_json::to_string(&RiskBranch::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_alert_display_is_message() {
        let alert = Alert::new(AlertKind::RecentOverdose, "recent overdose");
        assert_eq!(alert.to_string(), "recent overdose");
    }
}
