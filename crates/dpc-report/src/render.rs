//! # Text Rendering
//!
//! Plain-text presentation of audit and report structures, for terminals
//! and log attachments. Builders never print; everything visual lives here.

use dpc_rules::AuditResult;

use crate::analysis::{ComparisonReport, TrendAnalysis};
use crate::session::ReportData;
use crate::summary::ExecutiveSummary;

const RULE: &str = "------------------------------------------------------------";

fn heading(title: &str) -> Vec<String> {
    vec![RULE.to_string(), title.to_string(), RULE.to_string()]
}

/// Render an audit result.
pub fn audit(result: &AuditResult) -> String {
    let mut lines = heading(&format!("DP COMPLIANCE AUDIT: {}", result.profile_name));
    lines.push(format!("Date:        {}", result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(format!(
        "Rules:       {} total, {} compliant, {} non-compliant",
        result.total_rules, result.compliant_rules, result.non_compliant_rules
    ));
    lines.push(format!("Compliance:  {:.1}%", result.compliance_percentage));
    lines.push(format!("Status:      {}", result.status.as_str().to_uppercase()));
    if !result.violations.is_empty() {
        lines.push(String::new());
        lines.push("Violations:".to_string());
        for v in &result.violations {
            lines.push(format!(
                "  [{}] {} ({}): {}",
                v.severity.as_str().to_uppercase(),
                v.rule_id,
                v.category,
                v.description
            ));
        }
    }
    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    lines.extend(result.recommendations.iter().map(|r| format!("  {r}")));
    lines.join("\n")
}

/// Render a session report.
pub fn session_report(report: &ReportData) -> String {
    let mut lines = heading(&format!("DP SESSION REPORT: {}", report.vessel_name));
    lines.push(format!("Session:     {}", report.session_id));
    lines.push(format!("Date:        {}", report.report_date.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(format!(
        "Events:      {} total, {} critical",
        report.total_events, report.critical_events
    ));
    lines.push(format!("Score:       {:.1}%", report.compliance_score));
    if !report.event_distribution.is_empty() {
        lines.push(String::new());
        lines.push("Distribution:".to_string());
        for (event_type, count) in &report.event_distribution {
            lines.push(format!("  {:<28} {count}", event_type.label()));
        }
    }
    lines.push(String::new());
    lines.push("Recommendations:".to_string());
    lines.extend(report.recommendations.iter().map(|r| format!("  - {r}")));
    lines.join("\n")
}

/// Render a comparison.
pub fn comparison(report: &ComparisonReport) -> String {
    let mut lines = heading("AUDIT COMPARISON");
    for (i, entry) in report.entries.iter().enumerate() {
        lines.push(format!(
            "  #{:<3} {}  {:<20} {:>6.1}%  {:<6}  {} violation(s)",
            i + 1,
            entry.timestamp.format("%Y-%m-%d"),
            entry.profile_name,
            entry.compliance_percentage,
            entry.status,
            entry.violation_count
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Change:      {:+.1} points ({})",
        report.change, report.direction
    ));
    lines.join("\n")
}

/// Render a trend analysis.
pub fn trend(analysis: &TrendAnalysis) -> String {
    let mut lines = heading("COMPLIANCE TREND");
    lines.push(format!("Audits:      {}", analysis.audit_count));
    lines.push(format!("Average:     {:.1}%", analysis.average_score));
    lines.push(format!("Variation:   {:+.1} points", analysis.variation));
    lines.push(format!("Trend:       {}", analysis.direction));
    lines.join("\n")
}

/// Render an executive summary.
pub fn executive_summary(summary: &ExecutiveSummary) -> String {
    let mut lines = heading("EXECUTIVE SUMMARY");
    lines.push(format!("Audits:      {}", summary.audit_count));
    match summary.average_audit_score {
        Some(avg) => lines.push(format!("Average:     {avg:.1}%")),
        None => lines.push("Average:     n/a".to_string()),
    }
    lines.push(format!(
        "Latest:      {}",
        summary
            .latest_status
            .map(|s| s.as_str().to_uppercase())
            .unwrap_or_else(|| "n/a".to_string())
    ));
    lines.push(format!("Trend:       {}", summary.audit_trend));
    lines.push(format!(
        "Sessions:    {} ({} active)",
        summary.session_count, summary.active_sessions
    ));
    lines.push(format!(
        "Events:      {} total, {} critical, {} escalation(s)",
        summary.total_events, summary.critical_events, summary.escalations
    ));
    if !summary.latest_recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Latest recommendations:".to_string());
        lines.extend(summary.latest_recommendations.iter().map(|r| format!("  {r}")));
    }
    lines.join("\n")
}
