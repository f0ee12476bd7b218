//! # Engine and Reports Test
//!
//! The assembled engine from a config file on disk:
//! - Config discovery, relative profile paths, validation failures
//! - Audit history feeding comparison, trend and the executive summary
//! - Session archive and reports across several runs

use std::path::Path;

use chrono::{Duration as ChronoDuration, Utc};
use dpc_core::{ComplianceStatus, DpEvent, EventType, ValidationError};
use dpc_engine::{ComplianceEngine, ConfigError, EngineConfig};
use dpc_monitor::{ManualScheduler, SessionState};
use dpc_report::{render, TrendDirection};
use dpc_rules::{AuditResult, StateSnapshot};

const PROFILE_YAML: &str = r#"
- name: IMCA M 103
  rules:
    - { id: R1, category: Position Reference, text: t, severity: critical, action_required: a }
    - { id: R2, category: Thrusters, text: t, severity: high, action_required: a }
    - { id: R3, category: Power, text: t, severity: high, action_required: a }
    - { id: R4, category: Sensors, text: t, severity: medium, action_required: a }
- name: Operator DP
  rules:
    - { id: O1, category: Documentation, text: t, severity: low, action_required: a }
"#;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn engine_in(dir: &Path, extra: &str) -> ComplianceEngine {
    std::fs::create_dir_all(dir.join("profiles")).unwrap();
    write(dir, "profiles/dp.yaml", PROFILE_YAML);
    let config = write(
        dir,
        "dpc.yaml",
        &format!(
            "default_profile: IMCA M 103\nprofile_paths: [profiles/dp.yaml]\ncycle_interval_ms: 250\n{extra}"
        ),
    );
    let config = EngineConfig::load(&config).unwrap();
    ComplianceEngine::from_config(config).unwrap()
}

fn audit_with_score(score: f64) -> AuditResult {
    AuditResult {
        timestamp: Utc::now() - ChronoDuration::days(30),
        profile_name: "IMCA M 103".into(),
        total_rules: 10,
        compliant_rules: 0,
        non_compliant_rules: 0,
        compliance_percentage: score,
        status: ComplianceStatus::Yellow,
        violations: Vec::new(),
        recommendations: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// 1. Configuration
// ---------------------------------------------------------------------------

#[test]
fn config_resolves_profiles_relative_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), "");
    assert_eq!(engine.profiles().names(), vec!["IMCA M 103".to_string(), "Operator DP".to_string()]);
    assert_eq!(engine.config().cycle_interval().as_millis(), 250);
}

#[test]
fn zero_tolerance_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "dpc.json", r#"{"tolerance_limit": 0}"#);
    let err = EngineConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ValidationError::ZeroToleranceLimit)));
}

#[test]
fn missing_profile_file_fails_assembly() {
    let config = EngineConfig {
        profile_paths: vec!["/nonexistent/profiles.yaml".into()],
        ..EngineConfig::default()
    };
    assert!(matches!(
        ComplianceEngine::from_config(config),
        Err(ConfigError::Profiles(_))
    ));
}

#[test]
fn workflow_overrides_reach_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(
        dir.path(),
        "workflow:\n  actions:\n    sensor_fault: Switch to backup MRU\n",
    );
    engine.start_session("v");
    let outcome = engine.ingest(DpEvent::new(EventType::SensorFault, "v")).unwrap();
    assert_eq!(outcome.action.unwrap().action, "Switch to backup MRU");
}

// ---------------------------------------------------------------------------
// 2. Audits and analysis
// ---------------------------------------------------------------------------

#[test]
fn audits_accumulate_into_comparison_and_trend() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), "");

    assert!(engine.comparison_report().is_none());

    let half = StateSnapshot::new().with("R1", true).with("R2", true);
    let most = half.clone().with("R3", true);
    engine.run_default_audit(&half).unwrap();
    engine.run_audit("IMCA M 103", &most).unwrap();

    let cmp = engine.comparison_report().unwrap();
    assert_eq!(cmp.entries.len(), 2);
    assert_eq!(cmp.change, 25.0);
    assert_eq!(cmp.direction, TrendDirection::Improving);

    let trend = engine.trend();
    assert_eq!(trend.average_score, 62.5);
    assert_eq!(trend.direction, TrendDirection::Improving);

    assert!(engine.run_audit("DNV", &half).is_err());
    assert_eq!(engine.audit_history().len(), 2);
}

#[test]
fn comparison_and_trend_thresholds_differ() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), "");
    engine.import_audits([audit_with_score(80.0), audit_with_score(81.0)]);
    assert_eq!(engine.comparison_report().unwrap().direction, TrendDirection::Improving);
    assert_eq!(engine.trend().direction, TrendDirection::Stable);
}

#[test]
fn known_score_sequences() {
    let dir = tempfile::tempdir().unwrap();

    let engine = engine_in(&dir.path().join("a"), "");
    engine.import_audits([audit_with_score(60.0), audit_with_score(75.0)]);
    let cmp = engine.comparison_report().unwrap();
    assert_eq!(cmp.change, 15.0);
    assert_eq!(cmp.direction.as_str(), "improving");

    let engine = engine_in(&dir.path().join("b"), "");
    engine.import_audits([80.0, 78.0, 76.0].map(audit_with_score));
    let trend = engine.trend();
    assert_eq!(trend.variation, -4.0);
    assert_eq!(trend.direction, TrendDirection::Declining);
}

#[test]
fn single_audit_trend_is_stable_at_its_score() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), "");
    engine.import_audits([audit_with_score(64.0)]);
    let trend = engine.trend();
    assert_eq!(trend.average_score, 64.0);
    assert_eq!(trend.variation, 0.0);
    assert_eq!(trend.direction, TrendDirection::Stable);
}

// ---------------------------------------------------------------------------
// 3. Sessions and the executive summary
// ---------------------------------------------------------------------------

#[test]
fn sessions_archive_and_summarise() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), "tolerance_limit: 2\n");

    engine.start_session("Skandi Africa").unwrap();
    for t in [EventType::ThrusterFault, EventType::Normal, EventType::PowerAlarm] {
        engine.ingest(DpEvent::new(t, "Skandi Africa"));
    }
    let report = engine.stop_session().unwrap();
    assert_eq!(report.critical_events, 2);
    assert_eq!(engine.monitor().lock().state(), SessionState::Idle);

    engine.start_default_session().unwrap();
    engine.ingest(DpEvent::new(EventType::Normal, "v"));

    engine.run_default_audit(&StateSnapshot::new()).unwrap();

    let summary = engine.executive_summary();
    assert_eq!(summary.session_count, 2);
    assert_eq!(summary.active_sessions, 1);
    assert_eq!(summary.total_events, 4);
    assert_eq!(summary.critical_events, 2);
    assert_eq!(summary.escalations, 1);
    assert_eq!(summary.audit_count, 1);
    assert_eq!(summary.average_audit_score, Some(0.0));
    assert_eq!(summary.latest_status, Some(ComplianceStatus::Red));

    let text = render::executive_summary(&summary);
    assert!(text.contains("Sessions:    2 (1 active)"));
}

#[test]
fn periodic_driving_through_engine() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path(), "");
    engine.start_session("v");

    let scheduler = ManualScheduler::new();
    let token = engine.start_periodic(&scheduler);
    assert_eq!(scheduler.intervals()[0].as_millis(), 250);

    // The engine's feed is an empty queue: ticks find nothing to process.
    scheduler.run_ticks(4);
    assert_eq!(engine.session_report().unwrap().total_events, 0);
    token.cancel();
    assert!(engine.stop_session().is_some());
}
