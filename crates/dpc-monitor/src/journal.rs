//! # Session Journal
//!
//! Bounded, append-only record of what the monitor did: sessions opened and
//! closed, events processed, actions dispatched, escalations raised and
//! acknowledged. When the journal is over capacity the oldest 10% of
//! entries are dropped; hosts that need the full history should drain it
//! to storage first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::SessionId;

/// Kind of journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalEntryType {
    /// A session was opened.
    SessionStarted,
    /// An event was appended to the session.
    EventProcessed,
    /// A corrective action was dispatched.
    ActionDispatched,
    /// The tolerance limit was crossed.
    EscalationRaised,
    /// An escalation was acknowledged and re-armed.
    EscalationAcknowledged,
    /// The tolerance limit was changed.
    ToleranceChanged,
    /// The session was closed.
    SessionStopped,
}

impl JournalEntryType {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SessionStarted => "session_started",
            Self::EventProcessed => "event_processed",
            Self::ActionDispatched => "action_dispatched",
            Self::EscalationRaised => "escalation_raised",
            Self::EscalationAcknowledged => "escalation_acknowledged",
            Self::ToleranceChanged => "tolerance_changed",
            Self::SessionStopped => "session_stopped",
        }
    }
}

impl std::fmt::Display for JournalEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// What happened.
    pub entry_type: JournalEntryType,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
    /// Session the entry belongs to, if one was open.
    pub session_id: Option<SessionId>,
    /// Structured detail.
    pub metadata: Option<serde_json::Value>,
}

impl JournalEntry {
    /// Create an entry stamped now.
    pub fn new(
        entry_type: JournalEntryType,
        session_id: Option<SessionId>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            entry_type,
            timestamp: Utc::now(),
            session_id,
            metadata,
        }
    }
}

/// Append-only journal with a fixed capacity.
pub struct SessionJournal {
    entries: Vec<JournalEntry>,
    capacity: usize,
}

impl SessionJournal {
    /// Default capacity.
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Create a journal holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an entry, trimming the oldest 10% (at least one) on overflow.
    pub fn append(&mut self, entry: JournalEntry) {
        self.entries.push(entry);
        if self.entries.len() > self.capacity {
            let trim = (self.capacity / 10).max(1);
            self.entries.drain(..trim);
        }
    }

    /// Record an entry built from its parts.
    pub fn record(
        &mut self,
        entry_type: JournalEntryType,
        session_id: Option<SessionId>,
        metadata: Option<serde_json::Value>,
    ) {
        self.append(JournalEntry::new(entry_type, session_id, metadata));
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries of one kind.
    pub fn entries_by_type(&self, entry_type: JournalEntryType) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .collect()
    }

    /// Entries belonging to one session.
    pub fn entries_for_session(&self, session_id: SessionId) -> Vec<&JournalEntry> {
        self.entries
            .iter()
            .filter(|e| e.session_id == Some(session_id))
            .collect()
    }

    /// The last `n` entries.
    pub fn last_n(&self, n: usize) -> &[JournalEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Remove and return every entry.
    pub fn drain(&mut self) -> Vec<JournalEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum entries retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SessionJournal {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for SessionJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionJournal")
            .field("entries", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
