//! # Operational Events
//!
//! The fixed taxonomy of dynamic-positioning events the monitor observes,
//! and the [`DpEvent`] envelope the external telemetry feed delivers.
//!
//! Exactly one event type is neutral: [`EventType::Normal`]. Every other
//! type counts toward a session's tolerance limit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::severity::Severity;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// The operational event types reported by a DP control system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Station keeping within limits, no alarms.
    Normal,
    /// A position reference system (DGPS, HPR, taut wire, laser) dropped out.
    PositionReferenceLoss,
    /// A thruster tripped, failed to follow command, or lost feedback.
    ThrusterFault,
    /// Power management or UPS/backup supply alarm.
    PowerAlarm,
    /// A generator tripped or was lost from the bus.
    GeneratorFailure,
    /// Position or heading excursion beyond the warning limit.
    PositionExcursion,
    /// Gyro, MRU or wind sensor fault or disagreement.
    SensorFault,
    /// DP network or controller communication loss.
    CommunicationLoss,
}

impl EventType {
    /// All event types, neutral first.
    pub fn all() -> &'static [EventType] {
        &[
            Self::Normal,
            Self::PositionReferenceLoss,
            Self::ThrusterFault,
            Self::PowerAlarm,
            Self::GeneratorFailure,
            Self::PositionExcursion,
            Self::SensorFault,
            Self::CommunicationLoss,
        ]
    }

    /// Whether this is the neutral "normal operation" type.
    pub fn is_neutral(self) -> bool {
        self == Self::Normal
    }

    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::PositionReferenceLoss => "position_reference_loss",
            Self::ThrusterFault => "thruster_fault",
            Self::PowerAlarm => "power_alarm",
            Self::GeneratorFailure => "generator_failure",
            Self::PositionExcursion => "position_excursion",
            Self::SensorFault => "sensor_fault",
            Self::CommunicationLoss => "communication_loss",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal operation",
            Self::PositionReferenceLoss => "Position reference loss",
            Self::ThrusterFault => "Thruster fault",
            Self::PowerAlarm => "Power/backup alarm",
            Self::GeneratorFailure => "Generator failure",
            Self::PositionExcursion => "Position excursion",
            Self::SensorFault => "Sensor fault",
            Self::CommunicationLoss => "Communication loss",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownEventType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DpEvent
// ---------------------------------------------------------------------------

/// A single operational event delivered by the telemetry feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpEvent {
    /// What happened.
    pub event_type: EventType,
    /// When the source observed it.
    pub timestamp: DateTime<Utc>,
    /// Identifier of the vessel that reported it.
    pub vessel_id: String,
    /// Severity asserted by the source, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Compliance rule the source believes is affected, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_ref: Option<String>,
    /// Free-form source payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl DpEvent {
    /// Create an event stamped with the current UTC time.
    pub fn new(event_type: EventType, vessel_id: impl Into<String>) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            vessel_id: vessel_id.into(),
            severity: None,
            rule_ref: None,
            payload: None,
        }
    }

    /// Builder: set the observation time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builder: set the source-asserted severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Builder: set the affected rule reference.
    pub fn with_rule_ref(mut self, rule_ref: impl Into<String>) -> Self {
        self.rule_ref = Some(rule_ref.into());
        self
    }

    /// Builder: attach a source payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whether this event counts toward the tolerance limit.
    pub fn is_critical(&self) -> bool {
        !self.event_type.is_neutral()
    }
}
