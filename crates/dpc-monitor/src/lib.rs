//! # dpc-monitor — Live DP Event Monitoring
//!
//! Session-scoped monitoring of a vessel's DP event feed. The
//! [`EventMonitor`] pulls events from an [`EventSource`], annotates each
//! with the rule it threatens, dispatches corrective actions for faults,
//! counts them against the tolerance limit, and escalates through
//! [`EscalationSink`]s.
//!
//! ## Architecture
//!
//! - **Classifier** (`classifier.rs`): event type → threatened rule.
//! - **Workflow** (`workflow.rs`): event → corrective action, urgency
//!   ordering, action lifecycle.
//! - **Session** (`session.rs`): the per-run event log and counters.
//! - **Source** (`source.rs`): queue, channel and seeded simulated feeds.
//! - **Escalation** (`escalation.rs`): notifications and sinks.
//! - **Journal** (`journal.rs`): bounded record of monitor activity.
//! - **Scheduler** (`scheduler.rs`): cancellable periodic-driver contract.
//! - **Monitor** (`monitor.rs`): the `Idle → Monitoring → Stopped` machine.
//!
//! ## Concurrency
//!
//! One session per monitor, one cycle at a time. The monitor does no
//! threading; hosts that drive it from a timer share it as
//! [`SharedMonitor`] so cycles are serialized by the lock.

#![deny(missing_docs)]

pub mod classifier;
pub mod escalation;
pub mod journal;
pub mod monitor;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod workflow;

// Re-export primary types.
pub use classifier::EventClassifier;
pub use escalation::{Escalation, EscalationSink, LogEscalationSink, RecordingEscalationSink};
pub use journal::{JournalEntry, JournalEntryType, SessionJournal};
pub use monitor::{
    drive_periodically, CycleOutcome, EventMonitor, SharedMonitor, DEFAULT_TOLERANCE_LIMIT,
};
pub use scheduler::{CancellationToken, ManualScheduler, ScheduledTask, Scheduler};
pub use session::{MonitoringSession, SessionState};
pub use source::{ChannelEventSource, EventSource, QueueEventSource, SimulatedEventSource};
pub use workflow::{ActionStatus, WorkflowAction, WorkflowDispatcher};
