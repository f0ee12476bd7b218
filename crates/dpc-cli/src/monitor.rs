//! # Monitor Subcommand
//!
//! Runs one monitoring session and prints its report. Events come from a
//! JSON-lines file (one `DpEvent` per line) or from the seeded simulator.
//!
//! ```bash
//! dpc monitor --events feed.jsonl --vessel "Skandi Africa"
//! dpc monitor --simulate 7 --cycles 50 --tolerance 5
//! dpc monitor --simulate 7 --cycles 10 --periodic --interval-ms 1000
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Args;

use dpc_core::DpEvent;
use dpc_engine::ComplianceEngine;
use dpc_monitor::{EventSource, QueueEventSource, SimulatedEventSource};
use dpc_report::render;

use crate::scheduler::TokioScheduler;
use crate::Context;

/// Arguments for the monitor subcommand.
#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// JSON-lines event file to replay.
    #[arg(long, value_name = "PATH", required_unless_present = "simulate")]
    pub events: Option<PathBuf>,

    /// Generate events with this seed instead of replaying a file.
    #[arg(long, value_name = "SEED", conflicts_with = "events")]
    pub simulate: Option<u64>,

    /// Number of simulated events.
    #[arg(long, default_value_t = 20)]
    pub cycles: usize,

    /// Share of simulated events that are normal operation, 0 to 1.
    #[arg(long, value_name = "RATIO", value_parser = parse_ratio)]
    pub normal_ratio: Option<f64>,

    /// Vessel name. Defaults to the configured vessel.
    #[arg(long)]
    pub vessel: Option<String>,

    /// Profile used to annotate events with the rule they threaten.
    #[arg(long)]
    pub profile: Option<String>,

    /// Override the configured tolerance limit.
    #[arg(long)]
    pub tolerance: Option<u32>,

    /// Drive cycles from a timer instead of back to back.
    #[arg(long)]
    pub periodic: bool,

    /// Timer interval for --periodic. Defaults to `cycle_interval_ms`.
    #[arg(
        long,
        value_name = "MS",
        requires = "periodic",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: Option<u64>,

    /// Extra profile files (YAML or JSON) to load on top of the config.
    #[arg(long = "profile-file", value_name = "PATH")]
    pub profile_files: Vec<PathBuf>,
}

/// Execute the monitor subcommand.
pub fn run_monitor(args: &MonitorArgs, ctx: &Context) -> Result<u8> {
    let config = ctx.config()?;

    let (source, expected) = match (&args.events, args.simulate) {
        (Some(path), _) => {
            let events = read_events(path)?;
            let n = events.len();
            (Box::new(QueueEventSource::from_events(events)) as Box<dyn EventSource>, n)
        }
        (None, Some(seed)) => {
            let vessel_id = args
                .vessel
                .clone()
                .unwrap_or_else(|| config.vessel.name.clone());
            let mut sim = SimulatedEventSource::new(vessel_id, seed).with_limit(args.cycles);
            if let Some(ratio) = args.normal_ratio {
                anyhow::ensure!(
                    (0.0..=1.0).contains(&ratio),
                    "--normal-ratio must be between 0 and 1, got {ratio}"
                );
                sim = sim.with_normal_ratio(ratio);
            }
            (Box::new(sim) as Box<dyn EventSource>, args.cycles)
        }
        (None, None) => anyhow::bail!("either --events or --simulate is required"),
    };

    let engine = ctx.assemble(config, &args.profile_files, source)?;

    if let Some(name) = args.profile.as_deref() {
        engine.set_monitor_profile(name)?;
    }
    if let Some(limit) = args.tolerance {
        anyhow::ensure!(engine.set_tolerance_limit(limit), "tolerance limit must be at least 1");
    }

    let started = match &args.vessel {
        Some(name) => engine.start_session(name),
        None => engine.start_default_session(),
    };
    started.context("monitor refused to start a session")?;

    if args.periodic {
        let interval = args
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| engine.config().cycle_interval());
        anyhow::ensure!(!interval.is_zero(), "--interval-ms must be at least 1");
        run_periodic(&engine, interval, expected)?;
    } else {
        while engine.run_cycle().is_some() {}
    }

    let report = engine
        .stop_session()
        .context("session was not running when monitoring finished")?;
    ctx.emit(&report, render::session_report)?;
    Ok(0)
}

fn run_periodic(engine: &ComplianceEngine, interval: Duration, expected: usize) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async {
        let scheduler = TokioScheduler::current();
        let token = engine.start_periodic_every(&scheduler, interval);

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);
        let mut poll = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::info!("interrupted, stopping session");
                    break;
                }
                _ = poll.tick() => {
                    let seen = engine.session_report().map_or(0, |r| r.total_events);
                    if seen >= expected {
                        break;
                    }
                }
            }
        }
        token.cancel();
    });
    Ok(())
}

fn parse_ratio(s: &str) -> Result<f64, String> {
    let ratio: f64 = s.trim().parse().map_err(|e| format!("invalid ratio '{s}': {e}"))?;
    if (0.0..=1.0).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(format!("ratio must be between 0 and 1, got '{s}'"))
    }
}

/// Read one `DpEvent` per non-blank line.
pub fn read_events(path: &Path) -> Result<Vec<DpEvent>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open event file: {}", path.display()))?;
    let mut events = Vec::new();
    for (i, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let event: DpEvent = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid event", path.display(), i + 1))?;
        events.push(event);
    }
    tracing::debug!(path = %path.display(), count = events.len(), "event file read");
    Ok(events)
}
