//! # Audit Subcommand
//!
//! Audits one compliance profile against a state snapshot file, or against
//! a seeded simulation when no instrumentation is available.
//!
//! ```bash
//! dpc audit --profile "IMCA M 103" --snapshot state.json --out audits/2026-10.json
//! dpc audit --simulate 42
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use dpc_report::render;
use dpc_rules::{RuleEvaluator, SimulatedPredicate, StateSnapshot};

use crate::{read_json, Context};

/// Arguments for the audit subcommand.
#[derive(Args, Debug, Default)]
pub struct AuditArgs {
    /// Profile to audit. Defaults to the configured `default_profile`.
    #[arg(long)]
    pub profile: Option<String>,

    /// JSON object mapping rule ids (or other keys) to observed values.
    #[arg(long, value_name = "PATH", conflicts_with = "simulate")]
    pub snapshot: Option<PathBuf>,

    /// Decide each rule with a seeded weighted draw instead of a snapshot.
    #[arg(long, value_name = "SEED")]
    pub simulate: Option<u64>,

    /// Extra profile files (YAML or JSON) to load on top of the config.
    #[arg(long = "profile-file", value_name = "PATH")]
    pub profile_files: Vec<PathBuf>,

    /// Also write the audit result as JSON to this path.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Exit with code 2 when the compliance percentage is below this value.
    #[arg(long, value_name = "PERCENT")]
    pub fail_under: Option<f64>,
}

/// Execute the audit subcommand.
pub fn run_audit(args: &AuditArgs, ctx: &Context) -> Result<u8> {
    let mut engine = ctx.engine(&args.profile_files)?;
    if let Some(seed) = args.simulate {
        tracing::info!(seed, "auditing with simulated rule outcomes");
        engine = engine.with_evaluator(RuleEvaluator::new(SimulatedPredicate::new(seed)));
    }

    let snapshot: StateSnapshot = match &args.snapshot {
        Some(path) => read_json(path)?,
        None => StateSnapshot::new(),
    };

    let profile = args
        .profile
        .clone()
        .or_else(|| engine.config().default_profile.clone())
        .context("no --profile given and no default_profile configured")?;

    let result = engine.run_audit(&profile, &snapshot)?;

    if let Some(out) = &args.out {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(out, json)
            .with_context(|| format!("failed to write audit result: {}", out.display()))?;
        tracing::info!(path = %out.display(), "audit result written");
    }

    ctx.emit(&result, render::audit)?;

    match args.fail_under {
        Some(floor) if result.compliance_percentage < floor => Ok(2),
        _ => Ok(0),
    }
}
