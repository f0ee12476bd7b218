//! # Monitoring Session
//!
//! The record of one bounded monitoring run. Mutated only by its owning
//! [`EventMonitor`](crate::EventMonitor); consumers get it by reference or
//! as a finished clone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::{DpEvent, EventType, SessionId, VesselConfig};

use crate::workflow::WorkflowAction;

/// Monitor state machine. `Stopped` is terminal until an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session.
    Idle,
    /// A session is open and accepting cycles.
    Monitoring,
    /// The session has been closed.
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Monitoring => f.write_str("monitoring"),
            Self::Stopped => f.write_str("stopped"),
        }
    }
}

/// One monitoring run: the ordered event log plus its tolerance counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSession {
    /// Generated session id.
    pub id: SessionId,
    /// The vessel under observation.
    pub vessel: VesselConfig,
    /// When `start` opened the session.
    pub started_at: DateTime<Utc>,
    /// When `stop` closed the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    /// Events in append order.
    pub events: Vec<DpEvent>,
    /// Corrective actions dispatched during the session.
    #[serde(default)]
    pub actions: Vec<WorkflowAction>,
    /// Whether the session is still open.
    pub active: bool,
    /// Non-neutral events allowed before escalation.
    pub tolerance_limit: u32,
    /// Running count of non-neutral events. Monotonic within the session.
    pub critical_count: u32,
    /// Escalations raised so far.
    #[serde(default)]
    pub escalation_count: u32,
    /// Critical count at the last acknowledgment; escalation measures from here.
    #[serde(default)]
    pub escalation_baseline: u32,
    /// Whether an escalation is raised and not yet acknowledged.
    #[serde(default)]
    pub escalated: bool,
}

impl MonitoringSession {
    /// Open a new session for a vessel.
    pub fn new(vessel: VesselConfig, tolerance_limit: u32) -> Self {
        Self {
            id: SessionId::new(),
            vessel,
            started_at: Utc::now(),
            stopped_at: None,
            events: Vec::new(),
            actions: Vec::new(),
            active: true,
            tolerance_limit,
            critical_count: 0,
            escalation_count: 0,
            escalation_baseline: 0,
            escalated: false,
        }
    }

    /// The vessel's name.
    pub fn vessel_name(&self) -> &str {
        &self.vessel.name
    }

    /// Total events recorded.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Events of the neutral type.
    pub fn neutral_count(&self) -> usize {
        self.events.iter().filter(|e| e.event_type.is_neutral()).count()
    }

    /// Events of one type.
    pub fn count_of(&self, event_type: EventType) -> usize {
        self.events.iter().filter(|e| e.event_type == event_type).count()
    }

    /// Non-neutral events since the last acknowledgment.
    pub fn critical_since_ack(&self) -> u32 {
        self.critical_count.saturating_sub(self.escalation_baseline)
    }

    /// Whether the next check should raise an escalation.
    pub fn escalation_due(&self) -> bool {
        !self.escalated && self.critical_since_ack() >= self.tolerance_limit
    }

    /// Session length so far, or total length once stopped.
    pub fn duration(&self) -> chrono::Duration {
        self.stopped_at.unwrap_or_else(Utc::now) - self.started_at
    }
}
