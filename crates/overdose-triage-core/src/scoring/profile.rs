//! Scoring profile: interaction table, context weights and branch thresholds.
//!
//! The default profile is provisional. Its values keep the ordering the
//! harm-reduction literature agrees on (opioid + depressant combinations
//! outrank opioid + stimulant, and so on) but are not clinically calibrated.

use serde::{Deserialize, Serialize};

use crate::models::{Category, RiskBranch, RiskFactor};
use crate::reference::{ConfigError, ConfigResult};

/// Interaction weight between two distinct categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInteraction {
    pub a: Category,
    pub b: Category,
    pub weight: f64,
}

impl CategoryInteraction {
    pub fn new(a: Category, b: Category, weight: f64) -> Self {
        Self { a, b, weight }
    }

    fn involves(&self, x: Category, y: Category) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// Symmetric category-pair interaction table.
///
/// Pairs are unordered: looking up (a, b) and (b, a) always returns the same
/// weight. Pairs not listed get `default_weight`, so any new category pair
/// raises the score a little.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionTable {
    pub default_weight: f64,
    pub pairs: Vec<CategoryInteraction>,
}

impl Default for InteractionTable {
    fn default() -> Self {
        use Category::*;
        Self {
            default_weight: 0.5,
            pairs: vec![
                CategoryInteraction::new(Opioid, Benzodiazepine, 4.0),
                CategoryInteraction::new(Opioid, Depressant, 4.0),
                CategoryInteraction::new(Opioid, Gabapentinoid, 3.0),
                CategoryInteraction::new(Benzodiazepine, Depressant, 3.0),
                CategoryInteraction::new(Benzodiazepine, Gabapentinoid, 2.0),
                CategoryInteraction::new(Depressant, Gabapentinoid, 2.0),
                CategoryInteraction::new(Opioid, Dissociative, 2.0),
                CategoryInteraction::new(Depressant, Dissociative, 2.0),
                CategoryInteraction::new(Benzodiazepine, Dissociative, 1.5),
                CategoryInteraction::new(Opioid, Stimulant, 2.0),
                CategoryInteraction::new(Stimulant, Empathogen, 2.0),
                CategoryInteraction::new(Depressant, Empathogen, 1.5),
                CategoryInteraction::new(Depressant, Stimulant, 1.0),
                CategoryInteraction::new(Deliriant, Depressant, 1.5),
            ],
        }
    }
}

impl InteractionTable {
    /// Weight for an unordered pair of distinct categories.
    pub fn weight(&self, a: Category, b: Category) -> f64 {
        self.pairs
            .iter()
            .find(|pair| pair.involves(a, b))
            .map(|pair| pair.weight)
            .unwrap_or(self.default_weight)
    }

    fn validate(&self) -> ConfigResult<()> {
        check_weight("interaction default", self.default_weight)?;
        for (idx, pair) in self.pairs.iter().enumerate() {
            if pair.a == pair.b {
                return Err(ConfigError::InvalidProfile(format!(
                    "interaction pairs {} with itself",
                    pair.a
                )));
            }
            check_weight(&format!("{} + {}", pair.a, pair.b), pair.weight)?;
            if self.pairs[..idx].iter().any(|p| p.involves(pair.a, pair.b)) {
                return Err(ConfigError::InvalidProfile(format!(
                    "interaction {} + {} listed twice",
                    pair.a, pair.b
                )));
            }
        }
        Ok(())
    }
}

/// Weight of each context vulnerability factor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextWeights {
    pub opioid_dependence: f64,
    pub unstable_housing: f64,
    pub recent_overdose: f64,
    pub severe_mental_health: f64,
    pub polysubstance_history: f64,
}

impl Default for ContextWeights {
    fn default() -> Self {
        Self {
            opioid_dependence: 2.0,
            unstable_housing: 1.5,
            recent_overdose: 3.0,
            severe_mental_health: 1.5,
            polysubstance_history: 1.0,
        }
    }
}

impl ContextWeights {
    /// Weight for a single factor.
    pub fn weight(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::OpioidDependence => self.opioid_dependence,
            RiskFactor::UnstableHousing => self.unstable_housing,
            RiskFactor::RecentOverdose => self.recent_overdose,
            RiskFactor::SevereMentalHealth => self.severe_mental_health,
            RiskFactor::PolysubstanceHistory => self.polysubstance_history,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        check_weight("opioid_dependence", self.opioid_dependence)?;
        check_weight("unstable_housing", self.unstable_housing)?;
        check_weight("recent_overdose", self.recent_overdose)?;
        check_weight("severe_mental_health", self.severe_mental_health)?;
        check_weight("polysubstance_history", self.polysubstance_history)
    }
}

/// Lower bounds (inclusive) of each branch above Low.
///
/// Low covers `[0, moderate)`, Moderate `[moderate, high)`, High
/// `[high, critical)` and Critical `[critical, ∞)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BranchThresholds {
    pub moderate: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for BranchThresholds {
    fn default() -> Self {
        Self {
            moderate: 5.0,
            high: 10.0,
            critical: 16.0,
        }
    }
}

impl BranchThresholds {
    /// Branch whose band contains the score.
    pub fn classify(&self, total_score: f64) -> RiskBranch {
        if total_score >= self.critical {
            RiskBranch::Critical
        } else if total_score >= self.high {
            RiskBranch::High
        } else if total_score >= self.moderate {
            RiskBranch::Moderate
        } else {
            RiskBranch::Low
        }
    }

    /// Inclusive lower bound of a branch.
    pub fn lower_bound(&self, branch: RiskBranch) -> f64 {
        match branch {
            RiskBranch::Low => 0.0,
            RiskBranch::Moderate => self.moderate,
            RiskBranch::High => self.high,
            RiskBranch::Critical => self.critical,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        let ascending = 0.0 < self.moderate && self.moderate < self.high && self.high < self.critical;
        if !ascending || !self.critical.is_finite() {
            return Err(ConfigError::InvalidProfile(format!(
                "branch thresholds must be finite and ascending above 0 (got {}, {}, {})",
                self.moderate, self.high, self.critical
            )));
        }
        Ok(())
    }
}

/// Everything the scorers and classifier need besides reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringProfile {
    pub interactions: InteractionTable,
    pub context_weights: ContextWeights,
    pub thresholds: BranchThresholds,
}

impl ScoringProfile {
    /// Check every weight is non-negative and thresholds ascend.
    pub fn validate(&self) -> ConfigResult<()> {
        self.interactions.validate()?;
        self.context_weights.validate()?;
        self.thresholds.validate()
    }
}

fn check_weight(subject: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidWeight {
            subject: subject.to_string(),
            value,
        });
    }
    Ok(())
}
