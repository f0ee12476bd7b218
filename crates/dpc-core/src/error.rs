//! # Error Hierarchy
//!
//! Structured error types for the compliance engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Only configuration errors abort an operation. Sequencing problems in the
//! monitor, unmapped event types, and escalations are not errors at all;
//! they are logged and recovered locally by the components that see them.

use thiserror::Error;

/// Top-level error type for the compliance engine.
#[derive(Error, Debug)]
pub enum DpcError {
    /// A compliance profile was requested by a name the store does not hold.
    #[error(transparent)]
    ProfileNotFound(#[from] ProfileNotFoundError),

    /// Domain value validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A default-profile operation ran with no default profile configured.
    #[error("no default compliance profile configured")]
    NoDefaultProfile,
}

/// A lookup against the profile store named a profile it does not hold.
///
/// Callers must surface this; substituting a default profile would audit the
/// vessel against rules nobody asked for.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("compliance profile not found: \"{name}\"")]
pub struct ProfileNotFoundError {
    /// The profile name that was requested.
    pub name: String,
}

impl ProfileNotFoundError {
    /// Build the error for the given profile name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Validation errors for domain values parsed from text or configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Event type string does not name a known operational event.
    #[error("unknown event type: \"{0}\"")]
    UnknownEventType(String),

    /// Severity string is not one of critical/high/medium/low.
    #[error("unknown severity: \"{0}\" (expected critical, high, medium or low)")]
    UnknownSeverity(String),

    /// Status string is not one of green/yellow/red.
    #[error("unknown compliance status: \"{0}\" (expected green, yellow or red)")]
    UnknownStatus(String),

    /// DP class outside 1..=3.
    #[error("invalid DP class: {0} (expected 1, 2 or 3)")]
    InvalidDpClass(u8),

    /// A tolerance limit of zero would escalate before any event is seen.
    #[error("tolerance limit must be at least 1")]
    ZeroToleranceLimit,

    /// A profile was supplied without a name.
    #[error("compliance profile name must be non-empty")]
    EmptyProfileName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_not_found_display() {
        let err = DpcError::from(ProfileNotFoundError::new("IMCA M 103"));
        let msg = format!("{err}");
        assert!(msg.contains("profile not found"));
        assert!(msg.contains("IMCA M 103"));
    }

    #[test]
    fn validation_error_display() {
        let err = DpcError::Validation(ValidationError::UnknownSeverity("urgent".to_string()));
        let msg = format!("{err}");
        assert!(msg.contains("validation error"));
        assert!(msg.contains("urgent"));
    }

    #[test]
    fn unknown_event_type_carries_input() {
        let err = ValidationError::UnknownEventType("earthquake".to_string());
        assert!(format!("{err}").contains("earthquake"));
    }

    #[test]
    fn invalid_dp_class_display() {
        let err = ValidationError::InvalidDpClass(7);
        let msg = format!("{err}");
        assert!(msg.contains('7'));
        assert!(msg.contains("1, 2 or 3"));
    }

    #[test]
    fn zero_tolerance_limit_display() {
        assert!(format!("{}", ValidationError::ZeroToleranceLimit).contains("at least 1"));
    }

    #[test]
    fn no_default_profile_display() {
        let msg = format!("{}", DpcError::NoDefaultProfile);
        assert!(msg.contains("no default"));
        assert!(!msg.contains("not found"));
    }

    #[test]
    fn all_error_types_are_debug() {
        let e1 = DpcError::from(ProfileNotFoundError::new("x"));
        let e2 = ValidationError::EmptyProfileName;
        let e3 = ValidationError::UnknownStatus("blue".to_string());
        assert!(!format!("{e1:?}").is_empty());
        assert!(!format!("{e2:?}").is_empty());
        assert!(!format!("{e3:?}").is_empty());
    }
}
