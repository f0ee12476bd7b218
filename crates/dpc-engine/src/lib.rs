//! # dpc-engine — Compliance Engine Assembly
//!
//! Loads [`EngineConfig`] from YAML or JSON and assembles the
//! [`ComplianceEngine`], which owns the profile store, the rule evaluator,
//! the shared event monitor, the report engine, and the audit and session
//! histories that reports run over.
//!
//! ## Configuration Resolution
//!
//! 1. An explicit path (the CLI's `--config`).
//! 2. `$DPC_CONFIG`.
//! 3. Built-in defaults.
//!
//! Relative `profile_paths` resolve against the config file's directory.

#![deny(missing_docs)]

pub mod config;
pub mod orchestrator;

// Re-export primary types.
pub use config::{ConfigError, EngineConfig, WorkflowConfig, CONFIG_ENV, DEFAULT_CYCLE_INTERVAL_MS};
pub use orchestrator::ComplianceEngine;
