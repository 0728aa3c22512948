//! Client context models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recorded sex. Informational only, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Female,
    Male,
    IntersexOrOther,
}

impl Sex {
    /// Parse a free-form label. Unrecognized labels (including
    /// "prefer not to record") map to `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "female" | "f" => Some(Sex::Female),
            "male" | "m" => Some(Sex::Male),
            "intersex" | "other" | "intersex / other" | "intersex_or_other" => {
                Some(Sex::IntersexOrOther)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Female => write!(f, "Female"),
            Sex::Male => write!(f, "Male"),
            Sex::IntersexOrOther => write!(f, "Intersex / other"),
        }
    }
}

/// Person-level snapshot supplied alongside the substance text.
///
/// Age, weight, height and sex are carried for display and referral only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientContext {
    /// Age in years
    pub age: Option<u32>,
    /// Weight in kg
    pub weight_kg: Option<f64>,
    /// Height in cm
    pub height_cm: Option<f64>,
    /// Recorded sex
    pub sex: Option<Sex>,
    /// Known or suspected opioid dependence
    pub opioid_dependent: bool,
    /// Currently homeless or in unstable housing
    pub homeless: bool,
    /// Non-fatal overdose in the last 3-6 months
    pub recent_overdose: bool,
    /// Severe mental health difficulty
    pub severe_mental_health: bool,
    /// History of regular polysubstance use
    pub polysubstance_history: bool,
}

impl ClientContext {
    /// Body mass index, when both weight and height are known and plausible.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        if weight <= 0.0 || height_m <= 0.0 {
            return None;
        }
        Some(weight / (height_m * height_m))
    }
}
