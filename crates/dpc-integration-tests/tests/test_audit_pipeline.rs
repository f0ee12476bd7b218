//! # Audit Pipeline Test
//!
//! Profile files through the store into audits:
//! - YAML/JSON profile loading, single and list documents
//! - Snapshot evaluation, partitioning, status thresholds
//! - Unknown profile names are hard failures
//! - Recommendation grouping and serialization

use std::io::Write;

use dpc_core::{ComplianceStatus, DpcError, Severity};
use dpc_rules::{
    AuditResult, ComplianceProfile, ComplianceRule, ConstantPredicate, FnPredicate, ProfileStore,
    RuleEvaluator, StateSnapshot,
};
use proptest::prelude::*;

const IMCA_YAML: &str = r#"
name: IMCA M 103
version: "2.0"
authority: IMCA
levels:
  green: { threshold: 90.0, description: proceed }
  yellow: { threshold: 70.0, description: track actions }
  red: { threshold: 0.0, description: stop }
rules:
  - { id: PRS-01, category: Position Reference, text: three independent references, severity: critical, action_required: restore third reference }
  - { id: THR-01, category: Thrusters, text: thruster redundancy, severity: high, action_required: repair thruster }
  - { id: PWR-01, category: Power Management, text: UPS endurance, severity: high, action_required: test UPS }
  - { id: DOC-01, category: Documentation, text: DP logbook, severity: low, action_required: update logbook }
"#;

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{content}").unwrap();
    file
}

fn profile_with(n: usize) -> ComplianceProfile {
    let mut p = ComplianceProfile::new("Generated");
    for i in 0..n {
        p.rules.push(ComplianceRule::new(
            format!("R{i:02}"),
            "General",
            "text",
            Severity::all()[i % 4],
            "act",
        ));
    }
    p
}

fn snapshot_passing(ids: &[&str]) -> StateSnapshot {
    ids.iter().map(|id| (*id, true)).collect()
}

// ---------------------------------------------------------------------------
// 1. Loading
// ---------------------------------------------------------------------------

#[test]
fn yaml_profile_loads_into_store() {
    let file = write_temp(".yaml", IMCA_YAML);
    let store = ProfileStore::new();
    assert_eq!(store.load_from_path(file.path()).unwrap(), 1);

    let profile = store.get("IMCA M 103").unwrap();
    assert_eq!(profile.rule_count(), 4);
    assert_eq!(profile.authority, "IMCA");
    assert!(profile.levels.is_well_ordered());
}

#[test]
fn json_list_document_loads_every_profile() {
    let file = write_temp(
        ".json",
        r#"[{"name": "A", "rules": []}, {"name": "B", "rules": []}]"#,
    );
    let store = ProfileStore::new();
    assert_eq!(store.load_from_path(file.path()).unwrap(), 2);
    assert_eq!(store.names(), vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn load_replaces_previous_set() {
    let store = ProfileStore::with_profiles([ComplianceProfile::new("Old")]);
    store.load([ComplianceProfile::new("New")]);
    assert!(!store.contains("Old"));
    assert!(store.contains("New"));
}

// ---------------------------------------------------------------------------
// 2. Evaluation
// ---------------------------------------------------------------------------

#[test]
fn snapshot_audit_partitions_rules() {
    let file = write_temp(".yaml", IMCA_YAML);
    let store = ProfileStore::new();
    store.load_from_path(file.path()).unwrap();
    let profile = store.get("IMCA M 103").unwrap();

    let snap = snapshot_passing(&["PRS-01", "THR-01", "PWR-01"]);
    let result = RuleEvaluator::default().audit(&profile, &snap);

    assert_eq!(result.total_rules, 4);
    assert_eq!(result.compliant_rules, 3);
    assert_eq!(result.non_compliant_rules, 1);
    assert_eq!(result.compliance_percentage, 75.0);
    assert_eq!(result.status, ComplianceStatus::Yellow);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule_id, "DOC-01");
    assert_eq!(result.recommendations, vec!["LOW: 1 minor observation(s) recorded".to_string()]);
}

#[test]
fn status_thresholds_follow_profile_levels() {
    let profile = profile_with(100);
    let audit_at = |passing: usize| {
        RuleEvaluator::new(FnPredicate::new(move |rule: &ComplianceRule, _: &StateSnapshot| {
            rule.id[1..].parse::<usize>().unwrap() < passing
        }))
        .audit(&profile, &StateSnapshot::new())
    };
    assert_eq!(audit_at(92).status, ComplianceStatus::Green);
    assert_eq!(audit_at(75).status, ComplianceStatus::Yellow);
    assert_eq!(audit_at(50).status, ComplianceStatus::Red);
}

#[test]
fn empty_profile_is_fully_compliant() {
    let result = RuleEvaluator::new(ConstantPredicate(false))
        .audit(&ComplianceProfile::new("Empty"), &StateSnapshot::new());
    assert_eq!(result.total_rules, 0);
    assert_eq!(result.compliance_percentage, 100.0);
    assert_eq!(result.status, ComplianceStatus::Green);
}

#[test]
fn recommendations_group_critical_first() {
    let profile = ComplianceProfile::new("P")
        .with_rule(ComplianceRule::new("L1", "Docs", "t", Severity::Low, "log"))
        .with_rule(ComplianceRule::new("H1", "Thrusters", "t", Severity::High, "fix thruster"))
        .with_rule(ComplianceRule::new("C1", "Reference", "t", Severity::Critical, "add DGPS"));
    let result = RuleEvaluator::new(ConstantPredicate(false)).audit(&profile, &StateSnapshot::new());
    assert!(result.recommendations[0].starts_with("CRITICAL: 1"));
    assert_eq!(result.recommendations[1], "  - [C1] add DGPS");
    assert!(result.recommendations[2].starts_with("HIGH: 1"));
    assert_eq!(result.recommendations[3], "  - [H1] fix thruster");
    assert!(result.recommendations[4].starts_with("LOW: 1"));
    assert_eq!(result.recommendations.len(), 5);
}

// ---------------------------------------------------------------------------
// 3. Failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_profile_is_not_substituted() {
    let store = ProfileStore::with_profiles([profile_with(3)]);
    let err: DpcError = store.get("DNV ST-0111").unwrap_err().into();
    assert!(err.to_string().contains("DNV ST-0111"));
}

#[test]
fn malformed_profile_file_names_the_path() {
    let file = write_temp(".json", "{ not json");
    let err = ProfileStore::new().load_from_path(file.path()).unwrap_err();
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

// ---------------------------------------------------------------------------
// 4. Serialization
// ---------------------------------------------------------------------------

#[test]
fn audit_result_json_round_trip() {
    let profile = profile_with(6);
    let result = RuleEvaluator::default().audit(&profile, &snapshot_passing(&["R00", "R03"]));
    let json = serde_json::to_string(&result).unwrap();
    let back: AuditResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

// ---------------------------------------------------------------------------
// 5. Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn partition_and_bounds_hold(outcomes in proptest::collection::vec(any::<bool>(), 0..40)) {
        let profile = profile_with(outcomes.len());
        let snap: StateSnapshot = outcomes
            .iter()
            .enumerate()
            .map(|(i, ok)| (format!("R{i:02}"), *ok))
            .collect();
        let result = RuleEvaluator::default().audit(&profile, &snap);
        prop_assert_eq!(result.compliant_rules + result.non_compliant_rules, result.total_rules);
        prop_assert!((0.0..=100.0).contains(&result.compliance_percentage));
        prop_assert_eq!(result.status, profile.levels.classify(result.compliance_percentage));
        prop_assert_eq!(result.violations.len(), result.non_compliant_rules);
    }
}
