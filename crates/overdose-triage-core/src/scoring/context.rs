//! Context vulnerability score.

use crate::models::{ClientContext, ContextFactor, ContextScore, RiskFactor};

use super::ContextWeights;

/// Scores the person-level vulnerability flags.
///
/// Each set flag adds its weight once. Demographics never contribute.
pub struct ContextScorer<'a> {
    weights: &'a ContextWeights,
}

impl<'a> ContextScorer<'a> {
    pub fn new(weights: &'a ContextWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, context: &ClientContext) -> ContextScore {
        let flags = [
            (context.opioid_dependent, RiskFactor::OpioidDependence),
            (context.homeless, RiskFactor::UnstableHousing),
            (context.recent_overdose, RiskFactor::RecentOverdose),
            (context.severe_mental_health, RiskFactor::SevereMentalHealth),
            (context.polysubstance_history, RiskFactor::PolysubstanceHistory),
        ];

        let factors: Vec<ContextFactor> = flags
            .into_iter()
            .filter(|(set, _)| *set)
            .map(|(_, factor)| ContextFactor {
                factor,
                weight: self.weights.weight(factor),
            })
            .collect();

        ContextScore {
            total: factors.iter().map(|f| f.weight).sum(),
            factors,
        }
    }
}
