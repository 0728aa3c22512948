//! Triage engine.
//!
//! Pipeline: Extraction → Drug score + Context score → Branch → Alerts / Referral

mod classifier;

pub use classifier::*;

use std::sync::Arc;

use crate::extractor::Extractor;
use crate::models::{ClientContext, TriageResult};
use crate::reference::{ConfigResult, ReferenceData};
use crate::scoring::{ContextScorer, DrugScorer, ScoringProfile};

/// Scores free text plus client context against shared reference data.
///
/// Holds no mutable state: every call to [`TriageEngine::triage`] is a pure
/// function of its inputs, so one engine can serve many threads.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    reference: Arc<ReferenceData>,
    profile: ScoringProfile,
}

impl TriageEngine {
    /// Create an engine with a custom scoring profile.
    pub fn new(reference: Arc<ReferenceData>, profile: ScoringProfile) -> ConfigResult<Self> {
        profile.validate()?;
        Ok(Self { reference, profile })
    }

    /// Create an engine with the default scoring profile.
    pub fn with_default_profile(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            profile: ScoringProfile::default(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Triage one free-text substance description with its client context.
    #[doc(alias = "triage_from_text_and_context")]
    pub fn triage(&self, text: &str, context: &ClientContext) -> TriageResult {
        let catalog = self.reference.catalog();

        // Step 1: Split text into recognized and unknown substances
        let extraction = Extractor::new(catalog).extract(text);

        // Step 2: Score drugs and context separately
        let drug_score = DrugScorer::new(&self.reference, &self.profile.interactions)
            .score(&extraction.recognized);
        let context_score = ContextScorer::new(&self.profile.context_weights).score(context);
        let total_score = drug_score.total + context_score.total;

        // Step 3: Branch, alerts and referral
        let classifier = Classifier::new(catalog, &self.profile.thresholds);
        let branch = classifier.classify(total_score);
        let alerts = classifier.alerts(
            &extraction.recognized,
            &extraction.unknown,
            &drug_score,
            context,
        );
        let referral = classifier.referral(branch, &drug_score, context);

        tracing::debug!(
            detected = extraction.recognized.len(),
            unknown = extraction.unknown.len(),
            total_score,
            %branch,
            refer = referral.refer,
            "triage complete"
        );

        TriageResult {
            detected_drugs: extraction.recognized,
            unknown_drugs: extraction.unknown,
            drug_score,
            context_score,
            total_score,
            branch,
            interventions: interventions(branch),
            alerts,
            referral,
            reference_digest: self.reference.digest().to_string(),
        }
    }
}
