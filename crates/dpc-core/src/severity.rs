//! # Severity Tiers and Compliance Status
//!
//! The two ordinal scales shared by every component:
//!
//! - [`Severity`] classifies rule violations and workflow urgency,
//!   `critical > high > medium > low`.
//! - [`ComplianceStatus`] classifies an audit outcome, `green > yellow > red`.
//!
//! Both serialize as lowercase strings, which is the form profile
//! configuration files and report consumers use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a compliance rule, and therefore of any violation of it.
///
/// Variants are declared most-severe first, so the derived `Ord` sorts
/// critical items to the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Loss of station-keeping capability is possible; act immediately.
    Critical,
    /// Redundancy is degraded; act before the next operation.
    High,
    /// Procedural gap; schedule corrective work.
    Medium,
    /// Observation only.
    Low,
}

impl Severity {
    /// All severities, most severe first.
    pub fn all() -> &'static [Severity] {
        &[Self::Critical, Self::High, Self::Medium, Self::Low]
    }

    /// Urgency ordinal. Lower is more urgent.
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::UnknownSeverity(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ComplianceStatus
// ---------------------------------------------------------------------------

/// Traffic-light classification of an audit.
///
/// The status is never stored independently of the percentage it was derived
/// from: it is always recomputed from a profile's thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    /// Operation may proceed.
    Green,
    /// Operation may proceed with corrective actions tracked.
    Yellow,
    /// Operation should not proceed.
    Red,
}

impl ComplianceStatus {
    /// Ordering value. Higher is better.
    fn rank(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Yellow => 1,
            Self::Green => 2,
        }
    }

    /// Return the string value for serialization.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl PartialOrd for ComplianceStatus {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplianceStatus {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ComplianceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            _ => Err(ValidationError::UnknownStatus(s.to_string())),
        }
    }
}
