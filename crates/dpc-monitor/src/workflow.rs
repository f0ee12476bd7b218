//! # Workflow Dispatcher
//!
//! Turns non-neutral events into corrective [`WorkflowAction`]s and orders
//! batches of actions by urgency.
//!
//! ## Tables
//!
//! Both lookup tables are owned by the dispatcher instance and may be
//! changed at runtime (`set_action`, `remove_action`, `set_priority`), so
//! independent dispatchers can carry independent mappings.
//!
//! - **actions**: event type → corrective-action text.
//! - **priorities**: event type → urgency ordinal, `0` most urgent. Types
//!   absent from the table sort last.
//!
//! ## Action lifecycle
//!
//! 1. **Pending**: dispatched, not yet picked up.
//! 2. **InProgress**: crew working the action.
//! 3. **Completed** or **Failed**: terminal.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::{ActionId, DpEvent, EventType, Severity};

// ---------------------------------------------------------------------------
// ActionStatus
// ---------------------------------------------------------------------------

/// The execution status of a dispatched corrective action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Dispatched, not yet started.
    Pending,
    /// Being worked.
    InProgress,
    /// Done.
    Completed,
    /// Could not be carried out.
    Failed,
}

impl ActionStatus {
    /// Return whether this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// WorkflowAction
// ---------------------------------------------------------------------------

/// A corrective action dispatched for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowAction {
    /// Unique identifier for this action.
    pub id: ActionId,
    /// The event type that produced the action.
    pub event_type: EventType,
    /// Corrective-action text.
    pub action: String,
    /// When the action was dispatched.
    pub timestamp: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: ActionStatus,
    /// Reason recorded when the action failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl WorkflowAction {
    /// Create a pending action stamped with the current time.
    pub fn new(event_type: EventType, action: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(),
            event_type,
            action: action.into(),
            timestamp: Utc::now(),
            status: ActionStatus::Pending,
            failure_reason: None,
        }
    }

    /// Pending → InProgress. Returns `false` from any other state.
    pub fn start(&mut self) -> bool {
        if self.status == ActionStatus::Pending {
            self.status = ActionStatus::InProgress;
            return true;
        }
        false
    }

    /// InProgress → Completed. Returns `false` from any other state.
    pub fn complete(&mut self) -> bool {
        if self.status == ActionStatus::InProgress {
            self.status = ActionStatus::Completed;
            return true;
        }
        false
    }

    /// InProgress → Failed, recording the reason.
    pub fn fail(&mut self, reason: impl Into<String>) -> bool {
        if self.status == ActionStatus::InProgress {
            self.status = ActionStatus::Failed;
            self.failure_reason = Some(reason.into());
            return true;
        }
        false
    }
}

impl PartialEq for WorkflowAction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for WorkflowAction {}

// ---------------------------------------------------------------------------
// WorkflowDispatcher
// ---------------------------------------------------------------------------

/// Event → corrective-action dispatcher with a mutable priority table.
#[derive(Debug, Clone)]
pub struct WorkflowDispatcher {
    actions: BTreeMap<EventType, String>,
    priorities: BTreeMap<EventType, u8>,
}

impl WorkflowDispatcher {
    /// A dispatcher with the built-in action and priority tables.
    pub fn new() -> Self {
        let mut actions = BTreeMap::new();
        let mut priorities = BTreeMap::new();
        for &event_type in EventType::all() {
            if let Some(text) = default_action(event_type) {
                actions.insert(event_type, text.to_string());
            }
            if let Some(severity) = default_severity(event_type) {
                priorities.insert(event_type, severity.ordinal());
            }
        }
        Self {
            actions,
            priorities,
        }
    }

    /// A dispatcher with empty tables.
    pub fn empty() -> Self {
        Self {
            actions: BTreeMap::new(),
            priorities: BTreeMap::new(),
        }
    }

    /// Dispatch the corrective action for one event.
    ///
    /// Returns `None` for the neutral type. Returns `None` with a warning for
    /// a non-neutral type that has no action configured.
    pub fn dispatch(&self, event: &DpEvent) -> Option<WorkflowAction> {
        if event.event_type.is_neutral() {
            return None;
        }
        match self.actions.get(&event.event_type) {
            Some(text) => {
                let action = WorkflowAction::new(event.event_type, text.clone());
                tracing::debug!(
                    event_type = %event.event_type,
                    action_id = %action.id,
                    "workflow action dispatched"
                );
                Some(action)
            }
            None => {
                tracing::warn!(
                    event_type = %event.event_type,
                    vessel = %event.vessel_id,
                    "no corrective action configured for event type"
                );
                None
            }
        }
    }

    /// Dispatch every event in order, skipping those that yield no action.
    pub fn create_action_plan(&self, events: &[DpEvent]) -> Vec<WorkflowAction> {
        events.iter().filter_map(|e| self.dispatch(e)).collect()
    }

    /// Sort actions by priority ordinal, most urgent first.
    ///
    /// The sort is stable: equal-priority actions keep their relative order.
    /// Actions whose event type has no priority entry sort last.
    pub fn prioritize(&self, mut actions: Vec<WorkflowAction>) -> Vec<WorkflowAction> {
        actions.sort_by_key(|a| self.priority(a.event_type).unwrap_or(u8::MAX));
        actions
    }

    /// Priority ordinal for an event type, if configured.
    pub fn priority(&self, event_type: EventType) -> Option<u8> {
        self.priorities.get(&event_type).copied()
    }

    /// Corrective-action text for an event type, if configured.
    pub fn action_text(&self, event_type: EventType) -> Option<&str> {
        self.actions.get(&event_type).map(String::as_str)
    }

    /// Set the action text for an event type, returning the previous text.
    pub fn set_action(&mut self, event_type: EventType, action: impl Into<String>) -> Option<String> {
        self.actions.insert(event_type, action.into())
    }

    /// Remove the action for an event type. Later events of that type are
    /// reported as unmapped.
    pub fn remove_action(&mut self, event_type: EventType) -> Option<String> {
        self.actions.remove(&event_type)
    }

    /// Set the priority ordinal for an event type.
    pub fn set_priority(&mut self, event_type: EventType, ordinal: u8) -> Option<u8> {
        self.priorities.insert(event_type, ordinal)
    }

    /// Remove the priority for an event type, sending it to the back.
    pub fn remove_priority(&mut self, event_type: EventType) -> Option<u8> {
        self.priorities.remove(&event_type)
    }
}

impl Default for WorkflowDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in corrective-action text.
pub fn default_action(event_type: EventType) -> Option<&'static str> {
    let text = match event_type {
        EventType::Normal => return None,
        EventType::PositionReferenceLoss => {
            "Switch to backup position reference and verify DGPS/HPR signal quality"
        }
        EventType::ThrusterFault => {
            "Isolate the faulty thruster, rebalance thrust allocation and notify the chief engineer"
        }
        EventType::PowerAlarm => {
            "Check the power management system, confirm UPS/backup supply and prepare load shedding"
        }
        EventType::GeneratorFailure => {
            "Start the standby generator and verify bus configuration against the ASOG"
        }
        EventType::PositionExcursion => {
            "Reduce the operational envelope and assess whether to suspend operations"
        }
        EventType::SensorFault => {
            "Deselect the faulty sensor and cross-check remaining gyro/MRU/wind inputs"
        }
        EventType::CommunicationLoss => {
            "Switch to the redundant DP network and verify controller changeover"
        }
    };
    Some(text)
}

/// Built-in urgency tier per event type.
pub fn default_severity(event_type: EventType) -> Option<Severity> {
    match event_type {
        EventType::Normal => None,
        EventType::PositionReferenceLoss | EventType::PositionExcursion => Some(Severity::Critical),
        EventType::ThrusterFault | EventType::GeneratorFailure | EventType::PowerAlarm => {
            Some(Severity::High)
        }
        EventType::CommunicationLoss => Some(Severity::High),
        EventType::SensorFault => Some(Severity::Medium),
    }
}
