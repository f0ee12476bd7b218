//! # Compare Subcommand
//!
//! Comparison and trend over audit results stored with `dpc audit --out`.
//! Each file holds one audit result or a list of them; files are taken in
//! the order given, oldest first.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use dpc_report::{render, ComparisonReport, ExecutiveSummary, TrendAnalysis};
use dpc_rules::AuditResult;

use crate::{read_json, Context};

/// Arguments for the compare subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Audit result files, oldest first.
    #[arg(required = true, value_name = "AUDIT")]
    pub files: Vec<PathBuf>,

    /// Append the executive summary.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuditFile {
    One(Box<AuditResult>),
    Many(Vec<AuditResult>),
}

/// Everything the compare subcommand reports.
#[derive(Debug, Serialize)]
pub struct CompareOutput {
    /// `None` when fewer than two audits were given.
    pub comparison: Option<ComparisonReport>,
    /// Dead-banded trend.
    pub trend: TrendAnalysis,
    /// Present with `--summary`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ExecutiveSummary>,
}

/// Read audits from files, flattening lists.
pub fn read_audits(paths: &[PathBuf]) -> Result<Vec<AuditResult>> {
    let mut audits = Vec::new();
    for path in paths {
        audits.extend(read_audit_file(path)?);
    }
    Ok(audits)
}

fn read_audit_file(path: &Path) -> Result<Vec<AuditResult>> {
    Ok(match read_json::<AuditFile>(path)? {
        AuditFile::One(audit) => vec![*audit],
        AuditFile::Many(audits) => audits,
    })
}

/// Execute the compare subcommand.
pub fn run_compare(args: &CompareArgs, ctx: &Context) -> Result<u8> {
    let engine = ctx.engine(&[])?;
    engine.import_audits(read_audits(&args.files)?);

    let output = CompareOutput {
        comparison: engine.comparison_report(),
        trend: engine.trend(),
        summary: args.summary.then(|| engine.executive_summary()),
    };

    ctx.emit(&output, |o| {
        let mut sections = Vec::new();
        match &o.comparison {
            Some(c) => sections.push(render::comparison(c)),
            None => sections.push("At least two audits are needed for a comparison.".to_string()),
        }
        sections.push(render::trend(&o.trend));
        if let Some(s) = &o.summary {
            sections.push(render::executive_summary(s));
        }
        sections.join("\n\n")
    })?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpc_core::ComplianceStatus;

    fn audit(score: f64) -> AuditResult {
        AuditResult {
            timestamp: chrono::Utc::now(),
            profile_name: "IMCA M 103".into(),
            total_rules: 10,
            compliant_rules: 0,
            non_compliant_rules: 0,
            compliance_percentage: score,
            status: ComplianceStatus::Yellow,
            violations: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn single_and_list_files_flatten_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let one = dir.path().join("a.json");
        let many = dir.path().join("b.json");
        std::fs::write(&one, serde_json::to_string(&audit(70.0)).unwrap()).unwrap();
        std::fs::write(&many, serde_json::to_string(&vec![audit(75.0), audit(80.0)]).unwrap())
            .unwrap();

        let audits = read_audits(&[one, many]).unwrap();
        let scores: Vec<f64> = audits.iter().map(|a| a.compliance_percentage).collect();
        assert_eq!(scores, vec![70.0, 75.0, 80.0]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{\"score\": 1}").unwrap();
        assert!(read_audits(&[bad]).is_err());
    }
}
