//! # Report Engine
//!
//! Front door for the report builders, carrying the two heuristics that
//! hosts may tune. Never mutates its inputs.

use dpc_monitor::MonitoringSession;
use dpc_rules::AuditResult;

use crate::analysis::{self, ComparisonReport, TrendAnalysis, TREND_DEAD_BAND};
use crate::session::{self, ReportData};
use crate::summary::{self, ExecutiveSummary};

/// Default recurrence count that triggers a root-cause recommendation.
pub const ROOT_CAUSE_THRESHOLD: usize = 3;

/// Builds reports from sessions and audit histories.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    root_cause_threshold: usize,
    trend_dead_band: f64,
}

impl ReportEngine {
    /// An engine with the default heuristics.
    pub fn new() -> Self {
        Self {
            root_cause_threshold: ROOT_CAUSE_THRESHOLD,
            trend_dead_band: TREND_DEAD_BAND,
        }
    }

    /// Builder: recurrence count for root-cause lines (minimum 1).
    pub fn with_root_cause_threshold(mut self, threshold: usize) -> Self {
        self.root_cause_threshold = threshold.max(1);
        self
    }

    /// Builder: trend dead-band in percentage points (negative treated as 0).
    pub fn with_trend_dead_band(mut self, band: f64) -> Self {
        self.trend_dead_band = band.max(0.0);
        self
    }

    /// Summarise one monitoring session.
    pub fn session_report(&self, session: &MonitoringSession) -> ReportData {
        session::session_report(session, self.root_cause_threshold)
    }

    /// Compare audits oldest first. `None` for fewer than two.
    pub fn comparison_report(&self, audits: &[AuditResult]) -> Option<ComparisonReport> {
        analysis::comparison_report(audits)
    }

    /// Trend over audits oldest first.
    pub fn trend(&self, audits: &[AuditResult]) -> TrendAnalysis {
        analysis::trend(audits, self.trend_dead_band)
    }

    /// Combined digest of audits and sessions.
    pub fn executive_summary(
        &self,
        audits: &[AuditResult],
        sessions: &[MonitoringSession],
    ) -> ExecutiveSummary {
        summary::executive_summary(audits, sessions, self.trend_dead_band)
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TrendDirection;
    use dpc_core::{ComplianceStatus, DpEvent, EventType, VesselConfig};

    fn audit(score: f64) -> AuditResult {
        AuditResult {
            timestamp: chrono::Utc::now(),
            profile_name: "p".into(),
            total_rules: 0,
            compliant_rules: 0,
            non_compliant_rules: 0,
            compliance_percentage: score,
            status: ComplianceStatus::Yellow,
            violations: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn custom_dead_band() {
        let audits = vec![audit(70.0), audit(74.0)];
        assert_eq!(ReportEngine::new().trend(&audits).direction, TrendDirection::Improving);
        let wide = ReportEngine::new().with_trend_dead_band(5.0);
        assert_eq!(wide.trend(&audits).direction, TrendDirection::Stable);
    }

    #[test]
    fn custom_root_cause_threshold() {
        let mut session = MonitoringSession::new(VesselConfig::default(), 3);
        session.events = vec![
            DpEvent::new(EventType::SensorFault, "v"),
            DpEvent::new(EventType::SensorFault, "v"),
        ];
        assert!(ReportEngine::new()
            .session_report(&session)
            .recommendations
            .is_empty());
        let eager = ReportEngine::new().with_root_cause_threshold(2);
        assert_eq!(eager.session_report(&session).recommendations.len(), 1);
    }
}
