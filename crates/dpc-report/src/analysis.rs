//! # Audit Comparison and Trend
//!
//! Two views over an ordered audit history (oldest first):
//!
//! - [`comparison_report`]: every audit side by side, and the raw change
//!   from first to last. Any non-zero change is a direction.
//! - [`trend`]: mean score and first-to-last variation, with a dead-band so
//!   a single noisy audit does not flip the label.
//!
//! The two deliberately disagree on small changes: a +1 move is
//! "improving" in a comparison and "stable" in a trend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dpc_core::ComplianceStatus;
use dpc_rules::AuditResult;

/// Default trend dead-band, in percentage points.
pub const TREND_DEAD_BAND: f64 = 2.0;

/// Direction of change across audits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Scores went up.
    Improving,
    /// Scores went down.
    Declining,
    /// No meaningful change.
    Stable,
}

impl TrendDirection {
    /// Classify a change against a dead-band: `> band` improving,
    /// `< -band` declining, otherwise stable.
    pub fn classify(change: f64, band: f64) -> Self {
        if change > band {
            Self::Improving
        } else if change < -band {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One audit's row in a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// When the audit ran.
    pub timestamp: DateTime<Utc>,
    /// Profile audited.
    pub profile_name: String,
    /// Score.
    pub compliance_percentage: f64,
    /// Status.
    pub status: ComplianceStatus,
    /// Violations found.
    pub violation_count: usize,
}

impl From<&AuditResult> for ComparisonEntry {
    fn from(audit: &AuditResult) -> Self {
        Self {
            timestamp: audit.timestamp,
            profile_name: audit.profile_name.clone(),
            compliance_percentage: audit.compliance_percentage,
            status: audit.status,
            violation_count: audit.violations.len(),
        }
    }
}

/// Side-by-side audits with the first-to-last change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Audits in the order given.
    pub entries: Vec<ComparisonEntry>,
    /// `last.score - first.score`.
    pub change: f64,
    /// Direction of `change`, with no dead-band.
    pub direction: TrendDirection,
}

/// Compare two or more audits.
///
/// Returns `None` with a warning for fewer than two.
pub fn comparison_report(audits: &[AuditResult]) -> Option<ComparisonReport> {
    let (first, last) = match audits {
        [first, .., last] => (first, last),
        _ => {
            tracing::warn!(
                audits = audits.len(),
                "comparison needs at least two audits"
            );
            return None;
        }
    };
    let change = last.compliance_percentage - first.compliance_percentage;
    Some(ComparisonReport {
        entries: audits.iter().map(ComparisonEntry::from).collect(),
        change,
        direction: TrendDirection::classify(change, 0.0),
    })
}

/// Mean score and direction over an audit history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Audits considered.
    pub audit_count: usize,
    /// Mean score. The single score for one audit, 0 for none.
    pub average_score: f64,
    /// `last.score - first.score`; 0 for fewer than two audits.
    pub variation: f64,
    /// Direction of `variation` outside the dead-band.
    pub direction: TrendDirection,
}

/// Trend over an audit history with the given dead-band.
pub fn trend(audits: &[AuditResult], dead_band: f64) -> TrendAnalysis {
    let audit_count = audits.len();
    let average_score = if audit_count == 0 {
        0.0
    } else {
        audits.iter().map(|a| a.compliance_percentage).sum::<f64>() / audit_count as f64
    };
    let variation = match audits {
        [first, .., last] => last.compliance_percentage - first.compliance_percentage,
        _ => 0.0,
    };
    TrendAnalysis {
        audit_count,
        average_score,
        variation,
        direction: TrendDirection::classify(variation, dead_band),
    }
}
