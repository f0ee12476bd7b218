//! # Compliance Profiles
//!
//! A profile is a named, versioned rule catalogue plus the three status
//! thresholds that classify an audit. The engine treats the catalogue as
//! opaque configuration: rule wording and categories mean nothing to it
//! beyond grouping and keyword matching.

use serde::{Deserialize, Serialize};

use dpc_core::{ComplianceStatus, Severity};

// ---------------------------------------------------------------------------
// ComplianceRule
// ---------------------------------------------------------------------------

/// One checkpoint in a compliance profile. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRule {
    /// Stable rule identifier, unique within its profile.
    pub id: String,
    /// Free-text grouping (e.g. "Position Reference", "Power Management").
    pub category: String,
    /// The requirement as worded by the issuing authority.
    pub text: String,
    /// Severity of a violation of this rule.
    pub severity: Severity,
    /// Corrective action required when the rule is violated.
    pub action_required: String,
}

impl ComplianceRule {
    /// Create a rule.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        text: impl Into<String>,
        severity: Severity,
        action_required: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            text: text.into(),
            severity,
            action_required: action_required.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ComplianceLevel / ComplianceLevels
// ---------------------------------------------------------------------------

/// Minimum compliance percentage for one status tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceLevel {
    /// Minimum compliance percentage (inclusive) for this tier.
    pub threshold: f64,
    /// What the tier means operationally.
    #[serde(default)]
    pub description: String,
}

impl ComplianceLevel {
    /// Create a level.
    pub fn new(threshold: f64, description: impl Into<String>) -> Self {
        Self {
            threshold,
            description: description.into(),
        }
    }
}

/// The green/yellow/red thresholds of a profile.
///
/// Nothing forces `green.threshold > yellow.threshold`; see
/// [`ComplianceLevels::is_well_ordered`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceLevels {
    /// Threshold for [`ComplianceStatus::Green`].
    pub green: ComplianceLevel,
    /// Threshold for [`ComplianceStatus::Yellow`].
    pub yellow: ComplianceLevel,
    /// Threshold for [`ComplianceStatus::Red`].
    pub red: ComplianceLevel,
}

impl ComplianceLevels {
    /// Classify a compliance percentage.
    ///
    /// Thresholds are tested green, then yellow, then red; the first one met
    /// wins. A percentage below every threshold is red.
    pub fn classify(&self, percentage: f64) -> ComplianceStatus {
        if percentage >= self.green.threshold {
            ComplianceStatus::Green
        } else if percentage >= self.yellow.threshold {
            ComplianceStatus::Yellow
        } else {
            ComplianceStatus::Red
        }
    }

    /// The level for a given status.
    pub fn level(&self, status: ComplianceStatus) -> &ComplianceLevel {
        match status {
            ComplianceStatus::Green => &self.green,
            ComplianceStatus::Yellow => &self.yellow,
            ComplianceStatus::Red => &self.red,
        }
    }

    /// Whether the thresholds strictly descend green > yellow > red.
    pub fn is_well_ordered(&self) -> bool {
        self.green.threshold > self.yellow.threshold && self.yellow.threshold > self.red.threshold
    }
}

impl Default for ComplianceLevels {
    fn default() -> Self {
        Self {
            green: ComplianceLevel::new(90.0, "Operation may proceed"),
            yellow: ComplianceLevel::new(70.0, "Proceed with corrective actions tracked"),
            red: ComplianceLevel::new(0.0, "Operation should not proceed"),
        }
    }
}

// ---------------------------------------------------------------------------
// ComplianceProfile
// ---------------------------------------------------------------------------

/// A named, versioned rule catalogue with status thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceProfile {
    /// Profile name; the lookup key in the store.
    pub name: String,
    /// Catalogue version as published by the authority.
    #[serde(default)]
    pub version: String,
    /// Issuing authority (classification society, flag state, operator).
    #[serde(default)]
    pub authority: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<ComplianceRule>,
    /// Status thresholds.
    #[serde(default)]
    pub levels: ComplianceLevels,
}

impl ComplianceProfile {
    /// Create an empty profile with default thresholds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            authority: String::new(),
            description: String::new(),
            rules: Vec::new(),
            levels: ComplianceLevels::default(),
        }
    }

    /// Builder: set version and issuing authority.
    pub fn with_metadata(mut self, version: impl Into<String>, authority: impl Into<String>) -> Self {
        self.version = version.into();
        self.authority = authority.into();
        self
    }

    /// Builder: append a rule.
    pub fn with_rule(mut self, rule: ComplianceRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Builder: replace the thresholds.
    pub fn with_levels(mut self, levels: ComplianceLevels) -> Self {
        self.levels = levels;
        self
    }

    /// Look up a rule by identifier.
    pub fn rule(&self, rule_id: &str) -> Option<&ComplianceRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    /// Number of rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// The on-disk shape of a profile file: one profile or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ProfileDocument {
    Many(Vec<ComplianceProfile>),
    One(Box<ComplianceProfile>),
}

impl ProfileDocument {
    pub(crate) fn into_profiles(self) -> Vec<ComplianceProfile> {
        match self {
            Self::Many(profiles) => profiles,
            Self::One(profile) => vec![*profile],
        }
    }
}
