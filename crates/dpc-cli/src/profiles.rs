//! # Profiles Subcommand
//!
//! Lists the compliance profiles the engine has loaded.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::Context;

/// Arguments for the profiles subcommand.
#[derive(Args, Debug, Default)]
pub struct ProfilesArgs {
    /// Extra profile files (YAML or JSON) to load on top of the config.
    #[arg(long = "profile-file", value_name = "PATH")]
    pub profile_files: Vec<PathBuf>,
}

/// One listed profile.
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    /// Profile name.
    pub name: String,
    /// Catalogue version.
    pub version: String,
    /// Issuing authority.
    pub authority: String,
    /// Number of rules.
    pub rules: usize,
    /// Whether the green threshold is above the yellow one.
    pub well_ordered: bool,
}

/// Execute the profiles subcommand.
pub fn run_profiles(args: &ProfilesArgs, ctx: &Context) -> Result<u8> {
    let engine = ctx.engine(&args.profile_files)?;
    let mut listed: Vec<ProfileSummary> = engine
        .profiles()
        .list_all()
        .iter()
        .map(|p| ProfileSummary {
            name: p.name.clone(),
            version: p.version.clone(),
            authority: p.authority.clone(),
            rules: p.rule_count(),
            well_ordered: p.levels.is_well_ordered(),
        })
        .collect();
    listed.sort_by(|a, b| a.name.cmp(&b.name));

    ctx.emit(&listed, |listed| {
        if listed.is_empty() {
            return "No compliance profiles loaded.".to_string();
        }
        let mut lines = vec!["Loaded compliance profiles:".to_string(), String::new()];
        for p in listed {
            let mut line = format!("  {:<24} {:>3} rule(s)", p.name, p.rules);
            if !p.version.is_empty() {
                line.push_str(&format!("  v{}", p.version));
            }
            if !p.authority.is_empty() {
                line.push_str(&format!("  ({})", p.authority));
            }
            if !p.well_ordered {
                line.push_str("  [thresholds inverted]");
            }
            lines.push(line);
        }
        lines.push(String::new());
        lines.push(format!("Total: {} profile(s)", listed.len()));
        lines.join("\n")
    })?;
    Ok(0)
}
