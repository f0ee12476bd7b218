//! # Executive Summary
//!
//! One digest over the audit history and the monitoring sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::ComplianceStatus;
use dpc_monitor::MonitoringSession;
use dpc_rules::AuditResult;

use crate::analysis::{trend, TrendDirection};

/// Combined audit and monitoring digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    /// When the summary was produced.
    pub generated_at: DateTime<Utc>,
    /// Audits considered.
    pub audit_count: usize,
    /// Mean audit score, if any audits.
    pub average_audit_score: Option<f64>,
    /// Status of the most recent audit.
    pub latest_status: Option<ComplianceStatus>,
    /// Audit trend with the dead-band applied.
    pub audit_trend: TrendDirection,
    /// Sessions considered.
    pub session_count: usize,
    /// Sessions still open.
    pub active_sessions: usize,
    /// Events across all sessions.
    pub total_events: usize,
    /// Non-neutral events across all sessions.
    pub critical_events: usize,
    /// Escalations across all sessions.
    pub escalations: u32,
    /// Recommendations of the most recent audit.
    pub latest_recommendations: Vec<String>,
}

/// Build the digest. Audits are taken oldest first.
pub fn executive_summary(
    audits: &[AuditResult],
    sessions: &[MonitoringSession],
    dead_band: f64,
) -> ExecutiveSummary {
    let audit_trend = trend(audits, dead_band);
    let latest = audits.last();

    let total_events = sessions.iter().map(|s| s.events.len()).sum();
    let critical_events = sessions
        .iter()
        .flat_map(|s| s.events.iter())
        .filter(|e| e.is_critical())
        .count();

    ExecutiveSummary {
        generated_at: Utc::now(),
        audit_count: audits.len(),
        average_audit_score: (!audits.is_empty()).then_some(audit_trend.average_score),
        latest_status: latest.map(|a| a.status),
        audit_trend: audit_trend.direction,
        session_count: sessions.len(),
        active_sessions: sessions.iter().filter(|s| s.active).count(),
        total_events,
        critical_events,
        escalations: sessions.iter().map(|s| s.escalation_count).sum(),
        latest_recommendations: latest.map(|a| a.recommendations.clone()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TREND_DEAD_BAND;
    use dpc_core::{DpEvent, EventType, VesselConfig};

    fn audit(score: f64, status: ComplianceStatus) -> AuditResult {
        AuditResult {
            timestamp: Utc::now(),
            profile_name: "p".into(),
            total_rules: 4,
            compliant_rules: 0,
            non_compliant_rules: 0,
            compliance_percentage: score,
            status,
            violations: Vec::new(),
            recommendations: vec![format!("score {score}")],
        }
    }

    fn session(types: &[EventType], active: bool) -> MonitoringSession {
        let mut s = MonitoringSession::new(VesselConfig::default(), 3);
        s.events = types.iter().map(|&t| DpEvent::new(t, "v")).collect();
        s.active = active;
        s
    }

    #[test]
    fn aggregates_audits_and_sessions() {
        let audits = vec![
            audit(60.0, ComplianceStatus::Red),
            audit(80.0, ComplianceStatus::Yellow),
        ];
        let mut escalated = session(&[EventType::ThrusterFault; 3], false);
        escalated.escalation_count = 1;
        let sessions = vec![
            escalated,
            session(&[EventType::Normal, EventType::PowerAlarm], true),
        ];
        let s = executive_summary(&audits, &sessions, TREND_DEAD_BAND);
        assert_eq!(s.audit_count, 2);
        assert_eq!(s.average_audit_score, Some(70.0));
        assert_eq!(s.latest_status, Some(ComplianceStatus::Yellow));
        assert_eq!(s.audit_trend, TrendDirection::Improving);
        assert_eq!(s.session_count, 2);
        assert_eq!(s.active_sessions, 1);
        assert_eq!(s.total_events, 5);
        assert_eq!(s.critical_events, 4);
        assert_eq!(s.escalations, 1);
        assert_eq!(s.latest_recommendations, vec!["score 80".to_string()]);
    }

    #[test]
    fn empty_inputs() {
        let s = executive_summary(&[], &[], TREND_DEAD_BAND);
        assert_eq!(s.average_audit_score, None);
        assert_eq!(s.latest_status, None);
        assert_eq!(s.audit_trend, TrendDirection::Stable);
        assert_eq!(s.total_events, 0);
        assert!(s.latest_recommendations.is_empty());
    }
}
