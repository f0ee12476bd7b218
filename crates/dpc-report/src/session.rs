//! # Session Report
//!
//! Condenses a [`MonitoringSession`] into [`ReportData`]: event tallies, the
//! neutral-event compliance score, and heuristic recommendations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::{EventType, SessionId};
use dpc_monitor::MonitoringSession;

/// Recommendation emitted when a session saw no faults.
pub const NOMINAL: &str = "No DP incidents recorded: system operating nominally";

/// Summary of one monitoring session. Read-only once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    /// Session the report covers.
    pub session_id: SessionId,
    /// Vessel under observation.
    pub vessel_name: String,
    /// When the report was produced.
    pub report_date: DateTime<Utc>,
    /// Events recorded.
    pub total_events: usize,
    /// Non-neutral events recorded.
    pub critical_events: usize,
    /// `neutral / total * 100`, or 100 for an empty session.
    pub compliance_score: f64,
    /// Follow-up guidance.
    pub recommendations: Vec<String>,
    /// Event count per type. Only types that occurred are present.
    pub event_distribution: BTreeMap<EventType, usize>,
}

impl ReportData {
    /// Count for one event type.
    pub fn count_of(&self, event_type: EventType) -> usize {
        self.event_distribution.get(&event_type).copied().unwrap_or(0)
    }
}

/// Build the report for a session.
///
/// Any fault type seen at least `root_cause_threshold` times gets a
/// root-cause line, in event-type order.
pub fn session_report(session: &MonitoringSession, root_cause_threshold: usize) -> ReportData {
    let mut event_distribution: BTreeMap<EventType, usize> = BTreeMap::new();
    for event in &session.events {
        *event_distribution.entry(event.event_type).or_insert(0) += 1;
    }

    let total_events = session.events.len();
    let neutral = event_distribution
        .iter()
        .filter(|(t, _)| t.is_neutral())
        .map(|(_, n)| *n)
        .sum::<usize>();
    let critical_events = total_events - neutral;
    let compliance_score = if total_events == 0 {
        100.0
    } else {
        neutral as f64 / total_events as f64 * 100.0
    };

    ReportData {
        session_id: session.id,
        vessel_name: session.vessel.name.clone(),
        report_date: Utc::now(),
        total_events,
        critical_events,
        compliance_score,
        recommendations: session_recommendations(&event_distribution, root_cause_threshold),
        event_distribution,
    }
}

fn session_recommendations(
    distribution: &BTreeMap<EventType, usize>,
    root_cause_threshold: usize,
) -> Vec<String> {
    let faults: Vec<(EventType, usize)> = distribution
        .iter()
        .filter(|(t, n)| !t.is_neutral() && **n > 0)
        .map(|(t, n)| (*t, *n))
        .collect();
    if faults.is_empty() {
        return vec![NOMINAL.to_string()];
    }

    let mut lines: Vec<String> = faults
        .iter()
        .filter(|(_, n)| *n >= root_cause_threshold)
        .map(|(t, n)| {
            format!(
                "{} recurred {n} times: open a root-cause investigation",
                t.label()
            )
        })
        .collect();

    lines.extend(
        faults
            .iter()
            .filter_map(|(t, _)| canned_recommendation(*t))
            .map(str::to_string),
    );
    lines
}

fn canned_recommendation(event_type: EventType) -> Option<&'static str> {
    match event_type {
        EventType::PositionReferenceLoss => {
            Some("Review position reference redundancy and DGPS/HPR availability")
        }
        EventType::ThrusterFault => Some("Schedule a thruster maintenance inspection"),
        EventType::PowerAlarm => Some("Test UPS and backup power supply capacity"),
        _ => None,
    }
}
