//! Branch classification, interventions, alerts and referral decision.

use crate::extractor::suggest;
use crate::models::{
    Alert, AlertKind, Category, ClientContext, DrugScore, ReferralDecision, ReferralService,
    RiskBranch,
};
use crate::reference::Catalog;
use crate::scoring::BranchThresholds;

/// Turns scores into a branch and the guidance attached to it.
pub struct Classifier<'a> {
    catalog: &'a Catalog,
    thresholds: &'a BranchThresholds,
}

impl<'a> Classifier<'a> {
    /// Create a new classifier.
    pub fn new(catalog: &'a Catalog, thresholds: &'a BranchThresholds) -> Self {
        Self {
            catalog,
            thresholds,
        }
    }

    /// Branch whose band contains the total score.
    pub fn classify(&self, total_score: f64) -> RiskBranch {
        self.thresholds.classify(total_score)
    }

    /// Branch-independent alerts, in a fixed order: unknown substances,
    /// matched combinations, recent overdose, opioid tolerance, multiple
    /// depressants.
    pub fn alerts(
        &self,
        detected: &[String],
        unknown: &[String],
        drug_score: &DrugScore,
        context: &ClientContext,
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for span in unknown {
            let message = match suggest(self.catalog, span) {
                Some(s) if s.matched != s.name => format!(
                    "Unknown substance '{span}' (did you mean '{}', i.e. {}?). Confirm with the client.",
                    s.matched, s.name
                ),
                Some(s) => format!(
                    "Unknown substance '{span}' (did you mean '{}'?). Confirm with the client.",
                    s.name
                ),
                None => format!(
                    "Unknown substance '{span}'. Risk may be underestimated; ask the client what it is."
                ),
            };
            alerts.push(Alert::new(AlertKind::UnknownSubstance, message));
        }

        for combo in &drug_score.matched_combos {
            let message = match &combo.note {
                Some(note) => format!("Dangerous combination: {}. {note}", combo.label()),
                None => format!("Dangerous combination: {}", combo.label()),
            };
            alerts.push(Alert::new(AlertKind::DangerousCombination, message));
        }

        if context.recent_overdose {
            alerts.push(Alert::new(
                AlertKind::RecentOverdose,
                "Recent non-fatal overdose: high risk of repeat overdose. Offer naloxone.",
            ));
        }

        let opioids = self.names_where(detected, |categories| {
            categories.contains(&Category::Opioid)
        });
        if !opioids.is_empty() && !context.opioid_dependent {
            alerts.push(Alert::new(
                AlertKind::LowOpioidTolerance,
                format!(
                    "Opioid use ({}) without known dependence: tolerance may be low.",
                    opioids.join(", ")
                ),
            ));
        }

        let depressants = self.names_where(detected, |categories| {
            categories.iter().any(Category::is_cns_depressant)
        });
        if depressants.len() >= 2 {
            alerts.push(Alert::new(
                AlertKind::MultipleDepressants,
                format!(
                    "Multiple CNS depressants ({}): risk of respiratory depression.",
                    depressants.join(", ")
                ),
            ));
        }

        alerts
    }

    /// Referral decision.
    ///
    /// Refer when the branch is High or above, after a recent overdose, or
    /// when any known combination matched. Priority comes from the branch.
    pub fn referral(
        &self,
        branch: RiskBranch,
        drug_score: &DrugScore,
        context: &ClientContext,
    ) -> ReferralDecision {
        let mut triggers = Vec::new();
        if branch >= RiskBranch::High {
            triggers.push(format!("{branch} risk branch"));
        }
        if context.recent_overdose {
            triggers.push("recent non-fatal overdose".to_string());
        }
        if !drug_score.matched_combos.is_empty() {
            let labels: Vec<String> = drug_score
                .matched_combos
                .iter()
                .map(|c| c.label())
                .collect();
            triggers.push(format!("dangerous combination ({})", labels.join("; ")));
        }

        let refer = !triggers.is_empty();
        let reason = if !refer {
            format!(
                "No referral required ({branch} branch): no recent overdose or dangerous combination."
            )
        } else if branch >= RiskBranch::High {
            format!(
                "Referral recommended ({branch} branch): {}.",
                triggers.join(", ")
            )
        } else {
            // Service follows the branch even when a flag forced the referral
            format!(
                "Referral recommended despite {branch} branch: {} overrides the score band.",
                triggers.join(" and ")
            )
        };

        ReferralDecision {
            refer,
            priority: branch.priority(),
            reason,
            service: service_for(branch),
        }
    }

    /// Recognized names whose categories satisfy a predicate.
    fn names_where(&self, detected: &[String], pred: impl Fn(&[Category]) -> bool) -> Vec<String> {
        detected
            .iter()
            .filter_map(|name| self.catalog.lookup(name))
            .filter(|entry| pred(&entry.categories))
            .map(|entry| entry.name.clone())
            .collect()
    }
}

/// Suggested service for a branch.
pub fn service_for(branch: RiskBranch) -> ReferralService {
    match branch {
        RiskBranch::Low => ReferralService::HarmReductionInformation,
        RiskBranch::Moderate => ReferralService::CommunityDrugService,
        RiskBranch::High => ReferralService::SpecialistSubstanceTeam,
        RiskBranch::Critical => ReferralService::EmergencyServices,
    }
}

/// Recommended interventions for a branch.
pub fn interventions(branch: RiskBranch) -> Vec<String> {
    let steps: &[&str] = match branch {
        RiskBranch::Low => &[
            "Give harm-reduction information for the substances reported",
            "Advise not using alone and starting with a small test dose",
            "Share self-referral details for local drug services",
        ],
        RiskBranch::Moderate => &[
            "Brief intervention on the risks of the substances and combinations reported",
            "Offer a naloxone kit and show how to use it",
            "Advise not using alone and spacing doses",
            "Arrange follow-up within 7 days",
        ],
        RiskBranch::High => &[
            "Supply a naloxone kit and training before the client leaves",
            "Agree a safety plan: avoid using alone, reduce amounts, avoid mixing depressants",
            "Refer for same-day specialist substance use assessment",
            "Check in again before the end of the day",
        ],
        RiskBranch::Critical => &[
            "Check now for signs of overdose: breathing, responsiveness, pupils, skin colour",
            "Call emergency services if any sign of overdose is present",
            "Give naloxone if opioid overdose is suspected and place in recovery position",
            "Do not leave the client alone",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}
