//! Referral letter export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ClientContext, ReferralPriority, ReferralService, RiskBranch, TriageResult};

/// Referral letter built from a triage result and its client context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralLetter {
    /// Letter metadata
    pub metadata: ReferralMetadata,
    /// Client details as recorded
    pub client: ClientSummary,
    /// Assessment outcome
    pub assessment: AssessmentSummary,
}

/// Referral letter metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralMetadata {
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// Digest of the reference data behind the assessment
    pub reference_digest: String,
    /// Whether a referral is recommended
    pub refer: bool,
    pub priority: ReferralPriority,
    pub service: ReferralService,
    pub reason: String,
}

/// Client details. Informational; none of these were scored except flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// Derived body mass index
    pub bmi: Option<f64>,
    /// Vulnerability factors that contributed to the score
    pub risk_factors: Vec<String>,
}

/// Assessment outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub substances: Vec<String>,
    pub unknown_substances: Vec<String>,
    pub drug_score: f64,
    pub context_score: f64,
    pub total_score: f64,
    pub branch: RiskBranch,
    pub pathway: String,
    pub interventions: Vec<String>,
    pub alerts: Vec<String>,
}

impl ReferralLetter {
    /// Build a letter stamped with the given time.
    pub fn from_triage(result: &TriageResult, context: &ClientContext, at: DateTime<Utc>) -> Self {
        Self {
            metadata: ReferralMetadata {
                generated_at: at.to_rfc3339(),
                reference_digest: result.reference_digest.clone(),
                refer: result.referral.refer,
                priority: result.referral.priority,
                service: result.referral.service,
                reason: result.referral.reason.clone(),
            },
            client: ClientSummary {
                age: context.age,
                sex: context.sex.map(|s| s.to_string()),
                weight_kg: context.weight_kg,
                height_cm: context.height_cm,
                bmi: context.bmi().map(|b| (b * 10.0).round() / 10.0),
                risk_factors: result
                    .context_score
                    .factors
                    .iter()
                    .map(|f| f.factor.to_string())
                    .collect(),
            },
            assessment: AssessmentSummary {
                substances: result.detected_drugs.clone(),
                unknown_substances: result.unknown_drugs.clone(),
                drug_score: result.drug_score.total,
                context_score: result.context_score.total,
                total_score: result.total_score,
                branch: result.branch,
                pathway: result.branch.pathway().to_string(),
                interventions: result.interventions.clone(),
                alerts: result.alert_messages(),
            },
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export as a plain-text letter.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let m = &self.metadata;
        let c = &self.client;
        let a = &self.assessment;

        out.push_str("OVERDOSE RISK TRIAGE - REFERRAL\n");
        out.push_str(&format!("Generated: {}\n", m.generated_at));
        out.push_str(&format!("Reference data: {}\n", short_digest(&m.reference_digest)));
        out.push('\n');

        out.push_str("Client\n");
        out.push_str(&format!("  Age: {}\n", display_or_unknown(c.age)));
        out.push_str(&format!("  Sex: {}\n", c.sex.as_deref().unwrap_or("not recorded")));
        out.push_str(&format!("  Weight: {}\n", display_unit(c.weight_kg, "kg")));
        out.push_str(&format!("  Height: {}\n", display_unit(c.height_cm, "cm")));
        out.push_str(&format!("  BMI: {}\n", display_or_unknown(c.bmi)));
        if c.risk_factors.is_empty() {
            out.push_str("  Risk factors: none recorded\n");
        } else {
            out.push_str(&format!("  Risk factors: {}\n", c.risk_factors.join("; ")));
        }
        out.push('\n');

        out.push_str("Assessment\n");
        out.push_str(&format!("  Substances: {}\n", join_or_none(&a.substances)));
        out.push_str(&format!("  Unknown substances: {}\n", join_or_none(&a.unknown_substances)));
        out.push_str(&format!(
            "  Scores: drug {:.1}, context {:.1}, total {:.1}\n",
            a.drug_score, a.context_score, a.total_score
        ));
        out.push_str(&format!("  Risk branch: {} ({})\n", a.branch, a.pathway));
        if !a.alerts.is_empty() {
            out.push_str("  Alerts:\n");
            for alert in &a.alerts {
                out.push_str(&format!("    - {alert}\n"));
            }
        }
        out.push_str("  Interventions:\n");
        for step in &a.interventions {
            out.push_str(&format!("    - {step}\n"));
        }
        out.push('\n');

        out.push_str("Referral\n");
        out.push_str(&format!("  Refer: {}\n", if m.refer { "yes" } else { "no" }));
        out.push_str(&format!("  Priority: {}\n", m.priority));
        out.push_str(&format!("  Service: {}\n", m.service));
        out.push_str(&format!("  Reason: {}\n", m.reason));

        out
    }
}

/// Plain-text referral letter stamped with the current time.
pub fn build_referral_text(result: &TriageResult, context: &ClientContext) -> String {
    ReferralLetter::from_triage(result, context, Utc::now()).to_text()
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn display_or_unknown<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "not recorded".to_string(), |v| v.to_string())
}

fn display_unit(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "not recorded".to_string(), |v| format!("{v} {unit}"))
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
