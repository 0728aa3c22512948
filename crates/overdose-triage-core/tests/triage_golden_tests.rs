//! Golden tests for the triage engine.
//!
//! These tests run known inputs against the fixture reference data.

mod common;

use overdose_triage_core::{AlertKind, ClientContext, ReferralPriority, RiskBranch};

/// Test case with expected outcome.
struct GoldenCase {
    id: &'static str,
    text: &'static str,
    context: ClientContext,
    expected_detected: &'static [&'static str],
    expected_unknown: &'static [&'static str],
    expected_total: f64,
    expected_branch: RiskBranch,
    expected_refer: bool,
}

fn flags(f: impl FnOnce(&mut ClientContext)) -> ClientContext {
    let mut context = ClientContext::default();
    f(&mut context);
    context
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "heroin-alcohol",
            text: "heroin and alcohol",
            context: ClientContext::default(),
            expected_detected: &["heroin", "alcohol"],
            expected_unknown: &[],
            // base 7 + synergy 4 + combo 4
            expected_total: 15.0,
            expected_branch: RiskBranch::High,
            expected_refer: true,
        },
        GoldenCase {
            id: "paracetamol-only",
            text: "paracetamol",
            context: ClientContext::default(),
            expected_detected: &["paracetamol"],
            expected_unknown: &[],
            expected_total: 1.0,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "unknown-only",
            text: "xyzstuff",
            context: ClientContext::default(),
            expected_detected: &[],
            expected_unknown: &["xyzstuff"],
            expected_total: 0.0,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "empty-text",
            text: "",
            context: ClientContext::default(),
            expected_detected: &[],
            expected_unknown: &[],
            expected_total: 0.0,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "aliases-with-unknown",
            text: "smack, valium and a few beers",
            context: ClientContext::default(),
            expected_detected: &["heroin", "diazepam"],
            expected_unknown: &["beers"],
            // base 7 + synergy 4 + combo 4
            expected_total: 15.0,
            expected_branch: RiskBranch::High,
            expected_refer: true,
        },
        GoldenCase {
            id: "triple-depressant-recent-overdose",
            text: "Heroin, alcohol and valium",
            context: flags(|c| c.recent_overdose = true),
            expected_detected: &["heroin", "alcohol", "diazepam"],
            expected_unknown: &[],
            // base 10 + synergy 11 + combo 13 + context 3
            expected_total: 37.0,
            expected_branch: RiskBranch::Critical,
            expected_refer: true,
        },
        GoldenCase {
            id: "context-alone-no-referral",
            text: "weed",
            context: flags(|c| {
                c.homeless = true;
                c.severe_mental_health = true;
            }),
            expected_detected: &["cannabis"],
            expected_unknown: &[],
            expected_total: 4.0,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "combo-refers-below-high",
            text: "coke and booze",
            context: ClientContext::default(),
            expected_detected: &["cocaine", "alcohol"],
            expected_unknown: &[],
            // base 5 + synergy 1 + combo 3
            expected_total: 9.0,
            expected_branch: RiskBranch::Moderate,
            expected_refer: true,
        },
        GoldenCase {
            id: "multi-word-name",
            text: "crack cocaine",
            context: ClientContext::default(),
            expected_detected: &["crack cocaine"],
            expected_unknown: &[],
            expected_total: 2.5,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "meth-vs-methadone",
            text: "meth and methadone",
            context: ClientContext::default(),
            expected_detected: &["methamphetamine", "methadone"],
            expected_unknown: &[],
            // base 6 + opioid/stimulant synergy 2
            expected_total: 8.0,
            expected_branch: RiskBranch::Moderate,
            expected_refer: false,
        },
        GoldenCase {
            id: "quantities-ignored",
            text: "2 bags of gear, 10mg lyrica",
            context: ClientContext::default(),
            expected_detected: &["heroin", "pregabalin"],
            expected_unknown: &[],
            // base 6 + synergy 3 + combo 3
            expected_total: 12.0,
            expected_branch: RiskBranch::High,
            expected_refer: true,
        },
        GoldenCase {
            id: "single-multi-category-substance",
            text: "mdma",
            context: ClientContext::default(),
            expected_detected: &["mdma"],
            expected_unknown: &[],
            expected_total: 2.0,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "ketamine-vodka",
            text: "ketamine and vodka",
            context: ClientContext::default(),
            expected_detected: &["ketamine", "alcohol"],
            expected_unknown: &[],
            // base 5 + synergy 2 + combo 3
            expected_total: 10.0,
            expected_branch: RiskBranch::High,
            expected_refer: true,
        },
        GoldenCase {
            id: "possessive",
            text: "Heroin's",
            context: ClientContext::default(),
            expected_detected: &["heroin"],
            expected_unknown: &[],
            expected_total: 4.0,
            expected_branch: RiskBranch::Low,
            expected_refer: false,
        },
        GoldenCase {
            id: "dependent-fentanyl",
            text: "fent",
            context: flags(|c| c.opioid_dependent = true),
            expected_detected: &["fentanyl"],
            expected_unknown: &[],
            expected_total: 7.0,
            expected_branch: RiskBranch::Moderate,
            expected_refer: false,
        },
    ]
}

#[test]
fn test_golden_cases() {
    let engine = common::fixture_engine();

    for case in get_golden_cases() {
        let result = engine.triage(case.text, &case.context);

        assert_eq!(
            result.detected_drugs, case.expected_detected,
            "Case {}: detected mismatch", case.id
        );
        assert_eq!(
            result.unknown_drugs, case.expected_unknown,
            "Case {}: unknown mismatch", case.id
        );
        assert!(
            (result.total_score - case.expected_total).abs() < 1e-9,
            "Case {}: total mismatch - expected {}, got {}",
            case.id, case.expected_total, result.total_score
        );
        assert_eq!(result.branch, case.expected_branch, "Case {}: branch mismatch", case.id);
        assert_eq!(
            result.referral.refer, case.expected_refer,
            "Case {}: referral mismatch", case.id
        );
        assert_eq!(
            result.referral.priority,
            result.branch.priority(),
            "Case {}: priority must follow branch", case.id
        );
    }
}

#[test]
fn test_heroin_alcohol_breakdown() {
    let engine = common::fixture_engine();
    let result = engine.triage("heroin and alcohol", &ClientContext::default());

    assert_eq!(result.drug_score.base, 7.0);
    assert_eq!(result.drug_score.synergy, 4.0);
    assert_eq!(result.drug_score.combo, 4.0);
    assert_eq!(result.context_score.total, 0.0);
    assert!(result.has_alert(AlertKind::DangerousCombination));
    assert!(result.has_alert(AlertKind::LowOpioidTolerance));
    assert!(result.has_alert(AlertKind::MultipleDepressants));
    assert_eq!(result.referral.priority, ReferralPriority::Urgent);
}

#[test]
fn test_matched_combos_ordered_by_severity() {
    let engine = common::fixture_engine();
    let result = engine.triage("heroin, alcohol, valium", &ClientContext::default());

    let severities: Vec<f64> = result
        .drug_score
        .matched_combos
        .iter()
        .map(|c| c.severity)
        .collect();
    assert_eq!(severities, vec![4.0, 4.0, 3.0, 2.0]);
    assert_eq!(
        result
            .alerts
            .iter()
            .filter(|a| a.kind == AlertKind::DangerousCombination)
            .count(),
        4
    );
}

#[test]
fn test_unknown_alert_offers_suggestion() {
    let engine = common::fixture_engine();
    let result = engine.triage("smack, valium and a few beers", &ClientContext::default());

    let unknown: Vec<&str> = result
        .alerts
        .iter()
        .filter(|a| a.kind == AlertKind::UnknownSubstance)
        .map(|a| a.message.as_str())
        .collect();
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].contains("did you mean 'beer'"));
    // A suggestion never turns into a detection
    assert!(!result.detected_drugs.iter().any(|d| d == "alcohol"));
}

#[test]
fn test_recent_overdose_alert_and_referral_below_high() {
    let engine = common::fixture_engine();
    let context = ClientContext {
        recent_overdose: true,
        ..Default::default()
    };
    let result = engine.triage("paracetamol", &context);

    assert_eq!(result.branch, RiskBranch::Low);
    assert!(result.has_alert(AlertKind::RecentOverdose));
    assert!(result.referral.refer);
    assert_eq!(result.referral.priority, ReferralPriority::Routine);
    assert!(result.referral.reason.contains("recent non-fatal overdose"));
}

#[test]
fn test_demographics_never_change_score() {
    let engine = common::fixture_engine();
    let bare = engine.triage("heroin and alcohol", &ClientContext::default());
    let detailed = engine.triage(
        "heroin and alcohol",
        &ClientContext {
            age: Some(17),
            weight_kg: Some(45.0),
            height_cm: Some(150.0),
            sex: Some(overdose_triage_core::Sex::Female),
            ..Default::default()
        },
    );

    assert_eq!(bare.total_score, detailed.total_score);
    assert_eq!(bare.branch, detailed.branch);
}

#[test]
fn test_same_input_same_result() {
    let engine = common::fixture_engine();
    let context = ClientContext {
        homeless: true,
        ..Default::default()
    };
    let a = engine.triage("coke, booze and Blue Dolphins", &context);
    let b = engine.triage("coke, booze and Blue Dolphins", &context);
    assert_eq!(a, b);
}

#[test]
fn test_result_json_has_public_fields() {
    let engine = common::fixture_engine();
    let result = engine.triage("heroin and alcohol", &ClientContext::default());
    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    assert_eq!(value["branch"], "high");
    assert_eq!(value["detected_drugs"][1], "alcohol");
    assert_eq!(value["referral"]["refer"], true);
    assert_eq!(value["reference_digest"].as_str().unwrap().len(), 64);
}
