//! # Rule Evaluation
//!
//! Evaluates every rule of a profile against a [`StateSnapshot`], partitions
//! the rules into compliant and violated, computes the compliance percentage,
//! and classifies the status from the profile's thresholds.
//!
//! ## Invariants
//!
//! - `compliant_rules + non_compliant_rules == total_rules`
//! - `0 <= compliance_percentage <= 100`; an empty profile scores 100
//! - `status` is a pure function of `(compliance_percentage, profile.levels)`
//!
//! The evaluator holds no mutable state, so independent
//! `(profile, snapshot)` pairs may be evaluated concurrently.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::{ComplianceStatus, Severity};

use crate::predicate::{RulePredicate, SnapshotFlagPredicate};
use crate::profile::{ComplianceProfile, ComplianceRule};
use crate::snapshot::StateSnapshot;

// ---------------------------------------------------------------------------
// RuleViolation
// ---------------------------------------------------------------------------

/// A rule that evaluated non-compliant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    /// Identifier of the violated rule.
    pub rule_id: String,
    /// Category of the violated rule.
    pub category: String,
    /// Severity of the violated rule.
    pub severity: Severity,
    /// The rule text.
    pub description: String,
    /// Corrective action the rule prescribes.
    pub action_required: String,
}

impl From<&ComplianceRule> for RuleViolation {
    fn from(rule: &ComplianceRule) -> Self {
        Self {
            rule_id: rule.id.clone(),
            category: rule.category.clone(),
            severity: rule.severity,
            description: rule.text.clone(),
            action_required: rule.action_required.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// RuleEvaluation
// ---------------------------------------------------------------------------

/// The raw partition produced by evaluating one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation {
    /// Rules that passed, in profile order.
    pub compliant: Vec<ComplianceRule>,
    /// Violations, in profile order.
    pub violations: Vec<RuleViolation>,
    /// `compliant / total * 100`, or 100 for an empty profile.
    pub compliance_percentage: f64,
    /// Status classified from the profile thresholds.
    pub status: ComplianceStatus,
}

impl RuleEvaluation {
    /// Total rules evaluated.
    pub fn total(&self) -> usize {
        self.compliant.len() + self.violations.len()
    }
}

// ---------------------------------------------------------------------------
// AuditResult
// ---------------------------------------------------------------------------

/// The outcome of one audit: a profile evaluated against a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    /// When the audit ran.
    pub timestamp: DateTime<Utc>,
    /// Name of the profile evaluated.
    pub profile_name: String,
    /// Rules in the profile.
    pub total_rules: usize,
    /// Rules that passed.
    pub compliant_rules: usize,
    /// Rules that failed.
    pub non_compliant_rules: usize,
    /// `compliant_rules / total_rules * 100`.
    pub compliance_percentage: f64,
    /// Traffic-light classification.
    pub status: ComplianceStatus,
    /// Every failed rule, in profile order.
    pub violations: Vec<RuleViolation>,
    /// Severity-grouped corrective guidance.
    pub recommendations: Vec<String>,
}

impl AuditResult {
    /// Number of violations at the given severity.
    pub fn violation_count(&self, severity: Severity) -> usize {
        self.violations.iter().filter(|v| v.severity == severity).count()
    }
}

// ---------------------------------------------------------------------------
// RuleEvaluator
// ---------------------------------------------------------------------------

/// Evaluates profiles through an injected [`RulePredicate`].
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    predicate: Arc<dyn RulePredicate>,
}

impl RuleEvaluator {
    /// Create an evaluator around a predicate.
    pub fn new(predicate: impl RulePredicate + 'static) -> Self {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Create an evaluator around an already shared predicate.
    pub fn from_shared(predicate: Arc<dyn RulePredicate>) -> Self {
        Self { predicate }
    }

    /// Partition the profile's rules against the snapshot.
    pub fn evaluate(&self, profile: &ComplianceProfile, snapshot: &StateSnapshot) -> RuleEvaluation {
        let mut compliant = Vec::new();
        let mut violations = Vec::new();

        for rule in &profile.rules {
            if self.predicate.is_compliant(rule, snapshot) {
                compliant.push(rule.clone());
            } else {
                violations.push(RuleViolation::from(rule));
            }
        }

        let compliance_percentage = compliance_percentage(compliant.len(), profile.rules.len());
        let status = profile.levels.classify(compliance_percentage);

        RuleEvaluation {
            compliant,
            violations,
            compliance_percentage,
            status,
        }
    }

    /// Run a full audit: evaluate, then attach recommendations and a timestamp.
    pub fn audit(&self, profile: &ComplianceProfile, snapshot: &StateSnapshot) -> AuditResult {
        let evaluation = self.evaluate(profile, snapshot);
        let recommendations = recommendations(&evaluation.violations);

        tracing::info!(
            profile = %profile.name,
            total = evaluation.total(),
            violations = evaluation.violations.len(),
            percentage = evaluation.compliance_percentage,
            status = %evaluation.status,
            "audit completed"
        );

        AuditResult {
            timestamp: Utc::now(),
            profile_name: profile.name.clone(),
            total_rules: evaluation.total(),
            compliant_rules: evaluation.compliant.len(),
            non_compliant_rules: evaluation.violations.len(),
            compliance_percentage: evaluation.compliance_percentage,
            status: evaluation.status,
            violations: evaluation.violations,
            recommendations,
        }
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new(SnapshotFlagPredicate::new())
    }
}

/// `compliant / total * 100`, with an empty rule list scoring 100.
pub fn compliance_percentage(compliant: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (compliant as f64 / total as f64) * 100.0
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

/// Line emitted when an audit found nothing to correct.
pub const ALL_COMPLIANT: &str = "All rules compliant: maintain current DP procedures";

/// Group violations by severity into corrective guidance.
///
/// One header line per non-empty tier, critical first. Critical, high and
/// medium tiers list one action line per violation; low violations are
/// counted in their header but not listed individually.
pub fn recommendations(violations: &[RuleViolation]) -> Vec<String> {
    if violations.is_empty() {
        return vec![ALL_COMPLIANT.to_string()];
    }

    let mut lines = Vec::new();
    for &severity in Severity::all() {
        let tier: Vec<&RuleViolation> =
            violations.iter().filter(|v| v.severity == severity).collect();
        if tier.is_empty() {
            continue;
        }
        lines.push(tier_header(severity, tier.len()));
        if severity == Severity::Low {
            continue;
        }
        for violation in tier {
            lines.push(format!(
                "  - [{}] {}",
                violation.rule_id, violation.action_required
            ));
        }
    }
    lines
}

fn tier_header(severity: Severity, count: usize) -> String {
    match severity {
        Severity::Critical => format!("CRITICAL: {count} violation(s) require immediate action"),
        Severity::High => format!("HIGH: {count} violation(s) to resolve before the next DP operation"),
        Severity::Medium => format!("MEDIUM: {count} violation(s) to schedule for correction"),
        Severity::Low => format!("LOW: {count} minor observation(s) recorded"),
    }
}
