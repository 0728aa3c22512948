//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use overdose_triage_core::{
    CatalogEntry, Category, ComboEntry, EngineConfig, ReferenceData, SourceFormat, TriageEngine,
};

/// Directory holding the JSON fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Engine over the native-format fixture files.
pub fn fixture_engine() -> TriageEngine {
    EngineConfig::from_data_dir(&fixtures_dir(), SourceFormat::Native)
        .build_engine()
        .expect("fixture reference data loads")
}

/// Small in-code catalog used where file loading is beside the point.
pub fn small_engine() -> TriageEngine {
    let reference = ReferenceData::from_entries(
        vec![
            CatalogEntry::new("heroin", Category::Opioid, 4.0).with_aliases(["smack"]),
            CatalogEntry::new("alcohol", Category::Depressant, 3.0).with_aliases(["booze"]),
            CatalogEntry::new("diazepam", Category::Benzodiazepine, 3.0)
                .with_aliases(["valium"]),
            CatalogEntry::new("pregabalin", Category::Gabapentinoid, 2.0)
                .with_aliases(["lyrica"]),
            CatalogEntry::new("cocaine", Category::Stimulant, 2.0).with_aliases(["coke"]),
            CatalogEntry::new("ketamine", Category::Dissociative, 2.0),
            CatalogEntry::new("cannabis", Category::Cannabinoid, 1.0),
            CatalogEntry::new("paracetamol", Category::Analgesic, 1.0),
        ],
        vec![
            ComboEntry::new(["heroin", "alcohol"], 4.0),
            ComboEntry::new(["heroin", "diazepam"], 4.0),
            ComboEntry::new(["cocaine", "alcohol"], 3.0),
        ],
    )
    .expect("small catalog is valid");
    TriageEngine::with_default_profile(Arc::new(reference))
}

/// Canonical names in the small catalog.
pub const SMALL_CATALOG: &[&str] = &[
    "heroin",
    "alcohol",
    "diazepam",
    "pregabalin",
    "cocaine",
    "ketamine",
    "cannabis",
    "paracetamol",
];
