//! # Event Monitor
//!
//! Owns the single active [`MonitoringSession`] and drives it through
//! `Idle → Monitoring → Stopped`.
//!
//! ## Sequencing
//!
//! Control calls in the wrong state (`start` twice, `run_cycle` while idle,
//! `stop` with no session) are logged at `warn` and return `None`/`false`.
//! Nothing here returns an error: monitoring control is advisory.
//!
//! ## Escalation
//!
//! Every non-neutral event increments the session's critical count. When
//! the count since the last acknowledgment reaches the tolerance limit an
//! [`Escalation`] goes to each sink, once. It stays raised until
//! [`EventMonitor::acknowledge_escalation`] re-arms it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::json;

use dpc_core::{DpEvent, SessionId, VesselConfig};
use dpc_rules::{ComplianceProfile, ComplianceRule};

use crate::classifier::EventClassifier;
use crate::escalation::{Escalation, EscalationSink};
use crate::journal::{JournalEntryType, SessionJournal};
use crate::scheduler::{CancellationToken, Scheduler};
use crate::session::{MonitoringSession, SessionState};
use crate::source::{EventSource, QueueEventSource};
use crate::workflow::{WorkflowAction, WorkflowDispatcher};

/// Tolerance limit used when none is configured.
pub const DEFAULT_TOLERANCE_LIMIT: u32 = 3;

/// What one cycle did.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// The event appended to the session.
    pub event: DpEvent,
    /// The profile rule the event threatens, if a profile is attached.
    pub threatened_rule: Option<ComplianceRule>,
    /// Corrective action dispatched for the event.
    pub action: Option<WorkflowAction>,
    /// Escalation raised by the event.
    pub escalation: Option<Escalation>,
}

/// Drives a monitoring session over an injected event feed.
pub struct EventMonitor {
    state: SessionState,
    session: Option<MonitoringSession>,
    tolerance_limit: u32,
    vessel_template: VesselConfig,
    profile: Option<Arc<ComplianceProfile>>,
    classifier: EventClassifier,
    dispatcher: WorkflowDispatcher,
    source: Box<dyn EventSource>,
    sinks: Vec<Box<dyn EscalationSink>>,
    journal: SessionJournal,
}

impl EventMonitor {
    /// Create an idle monitor pulling from `source`.
    pub fn new(source: impl EventSource + 'static) -> Self {
        Self {
            state: SessionState::Idle,
            session: None,
            tolerance_limit: DEFAULT_TOLERANCE_LIMIT,
            vessel_template: VesselConfig::default(),
            profile: None,
            classifier: EventClassifier::new(),
            dispatcher: WorkflowDispatcher::new(),
            source: Box::new(source),
            sinks: Vec::new(),
            journal: SessionJournal::default(),
        }
    }

    /// Builder: initial tolerance limit. Zero is ignored with a warning.
    pub fn with_tolerance_limit(mut self, limit: u32) -> Self {
        self.set_tolerance_limit(limit);
        self
    }

    /// Builder: vessel configuration used by [`start`](Self::start).
    pub fn with_vessel(mut self, vessel: VesselConfig) -> Self {
        self.vessel_template = vessel;
        self
    }

    /// Builder: profile used to annotate threatened rules.
    pub fn with_profile(mut self, profile: Arc<ComplianceProfile>) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Builder: replace the classifier.
    pub fn with_classifier(mut self, classifier: EventClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Builder: replace the dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: WorkflowDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Builder: add an escalation sink.
    pub fn with_sink(mut self, sink: impl EscalationSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Builder: journal capacity.
    pub fn with_journal_capacity(mut self, capacity: usize) -> Self {
        self.journal = SessionJournal::new(capacity);
        self
    }

    // -- Control -----------------------------------------------------------

    /// Open a session for the configured vessel under a new name.
    pub fn start(&mut self, vessel_name: &str) -> Option<SessionId> {
        let vessel = self.vessel_template.clone().with_name(vessel_name);
        self.start_with_vessel(vessel)
    }

    /// Open a session for a fully specified vessel. Idle → Monitoring.
    pub fn start_with_vessel(&mut self, vessel: VesselConfig) -> Option<SessionId> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Monitoring => {
                tracing::warn!(
                    session_id = ?self.session_id(),
                    "monitoring already active, start ignored"
                );
                return None;
            }
            SessionState::Stopped => {
                tracing::warn!(
                    session_id = ?self.session_id(),
                    "monitor is stopped, reset before starting a new session"
                );
                return None;
            }
        }
        let session = MonitoringSession::new(vessel, self.tolerance_limit);
        let id = session.id;
        tracing::info!(
            session_id = %id,
            vessel = %session.vessel.name,
            dp_class = %session.vessel.dp_class,
            tolerance_limit = session.tolerance_limit,
            "monitoring session started"
        );
        self.journal.record(
            JournalEntryType::SessionStarted,
            Some(id),
            Some(json!({
                "vessel": session.vessel.name,
                "tolerance_limit": session.tolerance_limit,
            })),
        );
        self.session = Some(session);
        self.state = SessionState::Monitoring;
        Some(id)
    }

    /// Pull the next event from the source and process it.
    ///
    /// Returns `None` when not monitoring (with a warning) or when the source
    /// has nothing pending.
    pub fn run_cycle(&mut self) -> Option<CycleOutcome> {
        if !self.check_monitoring("run_cycle") {
            return None;
        }
        match self.source.next_event() {
            Some(event) => self.process(event),
            None => {
                tracing::debug!(session_id = ?self.session_id(), "no pending event this cycle");
                None
            }
        }
    }

    /// Process a pushed event through the same path as `run_cycle`.
    pub fn ingest(&mut self, event: DpEvent) -> Option<CycleOutcome> {
        if !self.check_monitoring("ingest") {
            return None;
        }
        self.process(event)
    }

    /// Close the session. Monitoring → Stopped.
    pub fn stop(&mut self) -> Option<&MonitoringSession> {
        if self.state != SessionState::Monitoring {
            tracing::warn!(state = %self.state, "no active monitoring session to stop");
            return None;
        }
        let session = self.session.as_mut()?;
        session.active = false;
        session.stopped_at = Some(Utc::now());
        tracing::info!(
            session_id = %session.id,
            events = session.events.len(),
            critical_events = session.critical_count,
            escalations = session.escalation_count,
            "monitoring session stopped"
        );
        self.journal.record(
            JournalEntryType::SessionStopped,
            Some(session.id),
            Some(json!({
                "events": session.events.len(),
                "critical_events": session.critical_count,
            })),
        );
        self.state = SessionState::Stopped;
        self.session.as_ref()
    }

    /// Stopped → Idle, handing back the finished session.
    pub fn reset(&mut self) -> Option<MonitoringSession> {
        if self.state != SessionState::Stopped {
            tracing::warn!(state = %self.state, "reset is only valid after stop");
            return None;
        }
        self.state = SessionState::Idle;
        self.session.take()
    }

    /// Change the tolerance limit for subsequent checks.
    ///
    /// Applies to the open session too. Zero is rejected with a warning and
    /// returns `false`.
    pub fn set_tolerance_limit(&mut self, limit: u32) -> bool {
        if limit == 0 {
            tracing::warn!("tolerance limit must be at least 1, keeping {}", self.tolerance_limit);
            return false;
        }
        let previous = self.tolerance_limit;
        self.tolerance_limit = limit;
        let mut session_id = None;
        if self.state == SessionState::Monitoring {
            if let Some(session) = self.session.as_mut() {
                session.tolerance_limit = limit;
                session_id = Some(session.id);
            }
        }
        self.journal.record(
            JournalEntryType::ToleranceChanged,
            session_id,
            Some(json!({ "from": previous, "to": limit })),
        );
        true
    }

    /// Re-arm escalation after a raised one has been handled.
    ///
    /// The next escalation needs another `tolerance_limit` non-neutral events.
    /// Returns `false` if nothing is raised.
    pub fn acknowledge_escalation(&mut self) -> bool {
        if self.state != SessionState::Monitoring {
            tracing::warn!(state = %self.state, "no active session to acknowledge");
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.escalated {
            tracing::warn!(session_id = %session.id, "no escalation raised to acknowledge");
            return false;
        }
        session.escalated = false;
        session.escalation_baseline = session.critical_count;
        tracing::info!(
            session_id = %session.id,
            critical_count = session.critical_count,
            "escalation acknowledged"
        );
        self.journal.record(
            JournalEntryType::EscalationAcknowledged,
            Some(session.id),
            Some(json!({ "critical_count": session.critical_count })),
        );
        true
    }

    /// Attach or replace the annotation profile.
    pub fn set_profile(&mut self, profile: Option<Arc<ComplianceProfile>>) {
        self.profile = profile;
    }

    /// Register an escalation sink.
    pub fn add_sink(&mut self, sink: impl EscalationSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    // -- Accessors ----------------------------------------------------------

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a session is open.
    pub fn is_monitoring(&self) -> bool {
        self.state == SessionState::Monitoring
    }

    /// The open or just-stopped session.
    pub fn session(&self) -> Option<&MonitoringSession> {
        self.session.as_ref()
    }

    /// Id of the open or just-stopped session.
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Configured tolerance limit.
    pub fn tolerance_limit(&self) -> u32 {
        self.tolerance_limit
    }

    /// The dispatcher, for inspection.
    pub fn dispatcher(&self) -> &WorkflowDispatcher {
        &self.dispatcher
    }

    /// The dispatcher, for runtime table changes.
    pub fn dispatcher_mut(&mut self) -> &mut WorkflowDispatcher {
        &mut self.dispatcher
    }

    /// The journal.
    pub fn journal(&self) -> &SessionJournal {
        &self.journal
    }

    /// The journal, for draining.
    pub fn journal_mut(&mut self) -> &mut SessionJournal {
        &mut self.journal
    }

    // -- Internals -----------------------------------------------------------

    fn check_monitoring(&self, operation: &str) -> bool {
        if self.state == SessionState::Monitoring {
            return true;
        }
        tracing::warn!(operation, state = %self.state, "no active monitoring session");
        false
    }

    fn process(&mut self, event: DpEvent) -> Option<CycleOutcome> {
        let session = self.session.as_mut()?;
        session.events.push(event.clone());

        let threatened_rule = self
            .profile
            .as_deref()
            .and_then(|p| self.classifier.classify(event.event_type, p))
            .cloned();

        tracing::debug!(
            session_id = %session.id,
            event_type = %event.event_type,
            rule = ?threatened_rule.as_ref().map(|r| r.id.as_str()),
            "event processed"
        );
        self.journal.record(
            JournalEntryType::EventProcessed,
            Some(session.id),
            Some(json!({
                "event_type": event.event_type,
                "rule": threatened_rule.as_ref().map(|r| r.id.clone()),
            })),
        );

        let mut action = None;
        let mut escalation = None;
        if event.is_critical() {
            session.critical_count += 1;

            action = self.dispatcher.dispatch(&event);
            if let Some(a) = &action {
                session.actions.push(a.clone());
                self.journal.record(
                    JournalEntryType::ActionDispatched,
                    Some(session.id),
                    Some(json!({
                        "action_id": a.id,
                        "event_type": a.event_type,
                        "action": a.action,
                    })),
                );
            }

            if session.escalation_due() {
                session.escalated = true;
                session.escalation_count += 1;
                let raised = Escalation {
                    session_id: session.id,
                    vessel_name: session.vessel.name.clone(),
                    critical_count: session.critical_count,
                    tolerance_limit: session.tolerance_limit,
                    triggered_by: event.event_type,
                    raised_at: Utc::now(),
                };
                tracing::warn!(
                    session_id = %session.id,
                    critical_count = session.critical_count,
                    tolerance_limit = session.tolerance_limit,
                    "tolerance limit reached"
                );
                self.journal.record(
                    JournalEntryType::EscalationRaised,
                    Some(session.id),
                    Some(json!({
                        "critical_count": raised.critical_count,
                        "tolerance_limit": raised.tolerance_limit,
                    })),
                );
                for sink in &self.sinks {
                    sink.notify(&raised);
                }
                escalation = Some(raised);
            }
        }

        Some(CycleOutcome {
            event,
            threatened_rule,
            action,
            escalation,
        })
    }
}

impl Default for EventMonitor {
    fn default() -> Self {
        Self::new(QueueEventSource::new())
    }
}

impl std::fmt::Debug for EventMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventMonitor")
            .field("state", &self.state)
            .field("session", &self.session_id())
            .field("tolerance_limit", &self.tolerance_limit)
            .field("sinks", &self.sinks.len())
            .field("journal", &self.journal)
            .finish()
    }
}

/// A monitor shared between a host and its periodic driver.
pub type SharedMonitor = Arc<Mutex<EventMonitor>>;

/// Run `run_cycle` on `monitor` every `interval` via `scheduler`.
///
/// Ticks arriving while the monitor is not monitoring are skipped without a
/// warning, so a stopped session does not flood the log before the host
/// cancels the token.
pub fn drive_periodically(
    monitor: SharedMonitor,
    scheduler: &dyn Scheduler,
    interval: Duration,
) -> CancellationToken {
    scheduler.schedule(
        interval,
        Box::new(move || {
            let mut monitor = monitor.lock();
            if monitor.is_monitoring() {
                monitor.run_cycle();
            }
        }),
    )
}
