//! # Escalation
//!
//! A tolerance-limit breach is a domain signal, not an error. The monitor
//! hands each [`Escalation`] to every registered [`EscalationSink`]; sinks
//! must not panic and have no way to fail the cycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use dpc_core::{EventType, SessionId};

/// Raised once per tolerance-limit crossing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    /// Session that crossed the limit.
    pub session_id: SessionId,
    /// Vessel under observation.
    pub vessel_name: String,
    /// Session critical count at the crossing.
    pub critical_count: u32,
    /// Limit in force at the crossing.
    pub tolerance_limit: u32,
    /// The event that tipped the count over.
    pub triggered_by: EventType,
    /// When the escalation was raised.
    pub raised_at: DateTime<Utc>,
}

/// Receives escalation notifications.
pub trait EscalationSink: Send + Sync {
    /// Called once per escalation.
    fn notify(&self, escalation: &Escalation);
}

/// Writes escalations to the log at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEscalationSink;

impl EscalationSink for LogEscalationSink {
    fn notify(&self, escalation: &Escalation) {
        tracing::warn!(
            session_id = %escalation.session_id,
            vessel = %escalation.vessel_name,
            critical_count = escalation.critical_count,
            tolerance_limit = escalation.tolerance_limit,
            triggered_by = %escalation.triggered_by,
            "tolerance limit reached, escalating to DP supervisor"
        );
    }
}

/// Keeps every escalation it receives. Clones share the same record, so a
/// caller can keep one handle while the monitor owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingEscalationSink {
    received: Arc<Mutex<Vec<Escalation>>>,
}

impl RecordingEscalationSink {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Escalations received so far, oldest first.
    pub fn escalations(&self) -> Vec<Escalation> {
        self.received.lock().clone()
    }

    /// Number received.
    pub fn len(&self) -> usize {
        self.received.lock().len()
    }

    /// Whether nothing has been received.
    pub fn is_empty(&self) -> bool {
        self.received.lock().is_empty()
    }
}

impl EscalationSink for RecordingEscalationSink {
    fn notify(&self, escalation: &Escalation) {
        self.received.lock().push(escalation.clone());
    }
}
