//! Overdose-Triage Core Library
//!
//! Acute overdose-risk triage from free-text substance mentions plus a
//! client-context snapshot.
//!
//! # Architecture
//!
//! ```text
//!   drugs.json + combos.json ──► ReferenceData (validated, digested, Arc-shared)
//!                                        │
//!   "heroin and alcohol" ──► Extractor ──┤
//!                                        ▼
//!                          recognized / unknown substances
//!                                        │
//!                     ┌──────────────────┼──────────────────┐
//!                     ▼                                     ▼
//!               Drug score                            Context score
//!         base + synergy + combo                   weighted flag sum
//!                     └──────────────────┬──────────────────┘
//!                                        ▼
//!                                  total score
//!                                        │
//!                                   Classifier
//!                      branch · interventions · alerts · referral
//!                                        │
//!                                        ▼
//!                            TriageResult ──► Referral letter
//! ```
//!
//! # Core Principle
//!
//! **Scores are decision support, not diagnosis.** Unknown substances are
//! always reported back; spelling suggestions are never auto-accepted.
//!
//! # Modules
//!
//! - [`models`]: Domain types (CatalogEntry, ClientContext, TriageResult, etc.)
//! - [`reference`]: Catalog and combo table loading, validation and TripSit import
//! - [`extractor`]: Free-text substance extraction and spelling suggestions
//! - [`scoring`]: Drug and context scoring, scoring profile
//! - [`triage`]: Engine and classifier
//! - [`export`]: Referral letter export
//! - [`config`]: Engine configuration file

pub mod config;
pub mod export;
pub mod extractor;
pub mod models;
pub mod reference;
pub mod scoring;
pub mod triage;

// Re-export commonly used types
pub use config::EngineConfig;
pub use export::{build_referral_text, ReferralLetter};
pub use extractor::{Extraction, Extractor};
pub use models::{
    Alert, AlertKind, CatalogEntry, Category, ClientContext, ComboEntry, ReferralDecision,
    ReferralPriority, ReferralService, RiskBranch, Sex, TriageResult,
};
pub use reference::{ConfigError, ConfigResult, ReferenceData, SourceFormat};
pub use scoring::ScoringProfile;
pub use triage::TriageEngine;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Ambiguous alias: {0}")]
    LookupAmbiguity(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ConfigError> for TriageError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::AmbiguousAlias { .. } => TriageError::LookupAmbiguity(e.to_string()),
            _ => TriageError::ConfigurationError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(e: serde_json::Error) -> Self {
        TriageError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an engine from an engine config file.
#[uniffi::export]
pub fn open_engine(config_path: String) -> Result<Arc<TriageService>, TriageError> {
    let engine = EngineConfig::from_file(Path::new(&config_path))?.build_engine()?;
    Ok(Arc::new(TriageService { engine }))
}

/// Open an engine from a directory holding `drugs.json` and `combos.json`.
#[uniffi::export]
pub fn open_engine_from_data_dir(
    dir: String,
    tripsit: bool,
) -> Result<Arc<TriageService>, TriageError> {
    let format = if tripsit {
        SourceFormat::Tripsit
    } else {
        SourceFormat::Native
    };
    let engine = EngineConfig::from_data_dir(Path::new(&dir), format).build_engine()?;
    Ok(Arc::new(TriageService { engine }))
}

/// Open an engine from native-format JSON text (for bundled data and tests).
#[uniffi::export]
pub fn open_engine_from_json(
    drugs_json: String,
    combos_json: String,
) -> Result<Arc<TriageService>, TriageError> {
    let reference = ReferenceData::from_json(&drugs_json, &combos_json, SourceFormat::Native)?;
    Ok(Arc::new(TriageService {
        engine: TriageEngine::with_default_profile(Arc::new(reference)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Shareable triage engine for FFI. Needs no lock: the engine is immutable.
#[derive(uniffi::Object)]
pub struct TriageService {
    engine: TriageEngine,
}

#[uniffi::export]
impl TriageService {
    /// Triage free text with client context.
    pub fn triage(&self, text: String, context: FfiClientContext) -> FfiTriageResult {
        self.engine.triage(&text, &context.into()).into()
    }

    /// Triage and return the full result as JSON.
    pub fn triage_json(
        &self,
        text: String,
        context: FfiClientContext,
    ) -> Result<String, TriageError> {
        Ok(self.engine.triage(&text, &context.into()).to_json()?)
    }

    /// Triage and render a plain-text referral letter.
    pub fn referral_text(&self, text: String, context: FfiClientContext) -> String {
        let context: ClientContext = context.into();
        let result = self.engine.triage(&text, &context);
        build_referral_text(&result, &context)
    }

    /// Digest of the loaded reference data.
    pub fn reference_digest(&self) -> String {
        self.engine.reference().digest().to_string()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe client context.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiClientContext {
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    /// Free-form label; unrecognized labels are treated as not recorded
    pub sex: Option<String>,
    pub opioid_dependent: bool,
    pub homeless: bool,
    pub recent_overdose: bool,
    pub severe_mental_health: bool,
    pub polysubstance_history: bool,
}

impl From<FfiClientContext> for ClientContext {
    fn from(ctx: FfiClientContext) -> Self {
        ClientContext {
            age: ctx.age,
            weight_kg: ctx.weight_kg,
            height_cm: ctx.height_cm,
            sex: ctx.sex.as_deref().and_then(Sex::parse),
            opioid_dependent: ctx.opioid_dependent,
            homeless: ctx.homeless,
            recent_overdose: ctx.recent_overdose,
            severe_mental_health: ctx.severe_mental_health,
            polysubstance_history: ctx.polysubstance_history,
        }
    }
}

/// FFI-safe triage result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTriageResult {
    pub detected_drugs: Vec<String>,
    pub unknown_drugs: Vec<String>,
    pub base_component: f64,
    pub synergy_component: f64,
    pub combo_component: f64,
    pub drug_score: f64,
    pub context_score: f64,
    pub total_score: f64,
    pub branch: String,
    pub interventions: Vec<String>,
    pub alerts: Vec<String>,
    pub refer: bool,
    pub referral_priority: String,
    pub referral_reason: String,
    pub referral_service: String,
    pub reference_digest: String,
}

impl From<TriageResult> for FfiTriageResult {
    fn from(result: TriageResult) -> Self {
        Self {
            alerts: result.alert_messages(),
            detected_drugs: result.detected_drugs,
            unknown_drugs: result.unknown_drugs,
            base_component: result.drug_score.base,
            synergy_component: result.drug_score.synergy,
            combo_component: result.drug_score.combo,
            drug_score: result.drug_score.total,
            context_score: result.context_score.total,
            total_score: result.total_score,
            branch: result.branch.to_string(),
            interventions: result.interventions,
            refer: result.referral.refer,
            referral_priority: result.referral.priority.to_string(),
            referral_reason: result.referral.reason,
            referral_service: result.referral.service.to_string(),
            reference_digest: result.reference_digest,
        }
    }
}
