//! # dpc CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dpc_cli::audit::{run_audit, AuditArgs};
use dpc_cli::compare::{run_compare, CompareArgs};
use dpc_cli::monitor::{run_monitor, MonitorArgs};
use dpc_cli::profiles::{run_profiles, ProfilesArgs};
use dpc_cli::{Context, OutputFormat};

/// DP compliance monitoring and audit engine.
///
/// Audits dynamic-positioning vessels against compliance profiles, monitors
/// DP event feeds with escalation, and reports on audit history.
#[derive(Parser, Debug)]
#[command(name = "dpc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to the engine configuration file (YAML or JSON).
    #[arg(long, global = true, env = dpc_engine::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List loaded compliance profiles.
    Profiles(ProfilesArgs),

    /// Audit a compliance profile against a state snapshot.
    Audit(AuditArgs),

    /// Replay or simulate a monitoring session.
    Monitor(MonitorArgs),

    /// Compare stored audit results and show the trend.
    Compare(CompareArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let ctx = Context {
        config: cli.config,
        format: cli.format,
    };

    let result = match &cli.command {
        Commands::Profiles(args) => run_profiles(args, &ctx),
        Commands::Audit(args) => run_audit(args, &ctx),
        Commands::Monitor(args) => run_monitor(args, &ctx),
        Commands::Compare(args) => run_compare(args, &ctx),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_audit_with_global_flags() {
        let cli = Cli::try_parse_from([
            "dpc", "-vv", "--format", "json", "audit", "--profile", "IMCA M 103", "--simulate", "42",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Audit(args) => {
                assert_eq!(args.profile.as_deref(), Some("IMCA M 103"));
                assert_eq!(args.simulate, Some(42));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn snapshot_conflicts_with_simulate() {
        let parsed = Cli::try_parse_from([
            "dpc", "audit", "--snapshot", "s.json", "--simulate", "1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn monitor_requires_a_feed() {
        assert!(Cli::try_parse_from(["dpc", "monitor"]).is_err());
        let cli = Cli::try_parse_from(["dpc", "monitor", "--simulate", "3", "--cycles", "5"]).unwrap();
        match cli.command {
            Commands::Monitor(args) => {
                assert_eq!(args.cycles, 5);
                assert!(!args.periodic);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn interval_requires_periodic() {
        assert!(Cli::try_parse_from([
            "dpc", "monitor", "--simulate", "3", "--interval-ms", "100"
        ])
        .is_err());
    }

    #[test]
    fn zero_interval_and_out_of_range_ratio_fail_to_parse() {
        let base = ["dpc", "monitor", "--simulate", "3", "--periodic"];
        assert!(Cli::try_parse_from(base.iter().chain(&["--interval-ms", "0"])).is_err());
        assert!(Cli::try_parse_from(base.iter().chain(&["--interval-ms", "1"])).is_ok());
        assert!(Cli::try_parse_from(base.iter().chain(&["--normal-ratio", "NaN"])).is_err());
        assert!(Cli::try_parse_from(base.iter().chain(&["--normal-ratio", "1.2"])).is_err());
        assert!(Cli::try_parse_from(base.iter().chain(&["--normal-ratio", "0.9"])).is_ok());
    }

    #[test]
    fn compare_requires_files() {
        assert!(Cli::try_parse_from(["dpc", "compare"]).is_err());
        assert!(Cli::try_parse_from(["dpc", "compare", "a.json", "b.json", "--summary"]).is_ok());
    }
}
