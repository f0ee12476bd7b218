//! # dpc-cli — DP Compliance Command-Line Interface
//!
//! Thin host over [`dpc_engine::ComplianceEngine`].
//!
//! ## Subcommands
//!
//! - `profiles`: list loaded compliance profiles
//! - `audit`: audit a profile against a snapshot file or a seeded simulation
//! - `monitor`: replay a JSON-lines event file or simulate a session
//! - `compare`: comparison, trend and summary over stored audit files
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in the `*Args` structs, handlers in `run_*`.
//! - Handlers delegate to the library crates and only format output.
//! - Handlers return the process exit code; errors map to exit code 1.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::Serialize;

use dpc_engine::{ComplianceEngine, EngineConfig};
use dpc_monitor::{EventSource, QueueEventSource};

pub mod audit;
pub mod compare;
pub mod monitor;
pub mod profiles;
pub mod scheduler;

/// Output rendering for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain-text report.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Config file, if given on the command line or through the environment.
    pub config: Option<PathBuf>,
    /// How results are printed.
    pub format: OutputFormat,
}

impl Context {
    /// Resolve the engine configuration.
    pub fn config(&self) -> Result<EngineConfig> {
        EngineConfig::discover(self.config.as_deref())
            .context("failed to load engine configuration")
    }

    /// Load the configuration and assemble an engine with an empty event
    /// queue, loading any extra profile files on top of the configured ones.
    pub fn engine(&self, extra_profiles: &[PathBuf]) -> Result<ComplianceEngine> {
        self.assemble(self.config()?, extra_profiles, QueueEventSource::new())
    }

    /// Assemble an engine monitoring `source`.
    pub fn assemble(
        &self,
        config: EngineConfig,
        extra_profiles: &[PathBuf],
        source: impl EventSource + 'static,
    ) -> Result<ComplianceEngine> {
        let engine = ComplianceEngine::from_config_with_source(config, source)
            .context("failed to assemble engine")?;
        if !extra_profiles.is_empty() {
            engine
                .profiles()
                .load_from_paths(extra_profiles)
                .context("failed to load profile files")?;
        }
        Ok(engine)
    }

    /// Print `value` as JSON, or the text produced by `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            OutputFormat::Text => println!("{}", text(value)),
        }
        Ok(())
    }
}

/// Read a JSON document from disk.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn engine_loads_extra_profiles() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "Operator DP", "rules": []}}"#).unwrap();
        let config = write_config();
        let ctx = Context {
            config: Some(config.path().to_path_buf()),
            ..Context::default()
        };
        let engine = ctx.engine(&[file.path().to_path_buf()]).unwrap();
        assert!(engine.profiles().contains("Operator DP"));
    }

    #[test]
    fn missing_config_is_an_error() {
        let ctx = Context {
            config: Some(PathBuf::from("/nonexistent/dpc.yaml")),
            ..Context::default()
        };
        assert!(ctx.engine(&[]).is_err());
    }

    fn write_config() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "tolerance_limit: 4\n").unwrap();
        file
    }
}
