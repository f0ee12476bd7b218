//! # Engine Configuration
//!
//! [`EngineConfig`] is read from YAML (`.yaml`/`.yml`) or JSON (`.json`).
//! Every field has a default, so an empty document is a valid config.
//! Relative profile paths are resolved against the config file's directory.
//!
//! Lookup order used by hosts: an explicit path, then the file named by
//! `DPC_CONFIG`, then built-in defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dpc_core::{EventType, ValidationError, VesselConfig};
use dpc_monitor::{SessionJournal, WorkflowDispatcher, DEFAULT_TOLERANCE_LIMIT};
use dpc_rules::ProfileLoadError;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DPC_CONFIG";

/// Default periodic-driver interval.
pub const DEFAULT_CYCLE_INTERVAL_MS: u64 = 5_000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The extension is neither YAML nor JSON.
    #[error("unsupported config format for {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat {
        /// Offending file.
        path: PathBuf,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML config at {path}: {source}")]
    YamlParse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON config at {path}: {source}")]
    JsonParse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),

    /// The periodic interval is zero.
    #[error("cycle_interval_ms must be at least 1")]
    ZeroCycleInterval,

    /// A configured profile file failed to load.
    #[error(transparent)]
    Profiles(#[from] ProfileLoadError),
}

// ---------------------------------------------------------------------------
// WorkflowConfig
// ---------------------------------------------------------------------------

/// Overrides merged over the built-in dispatcher tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Event type → corrective-action text.
    pub actions: BTreeMap<EventType, String>,
    /// Event type → priority ordinal (0 most urgent).
    pub priorities: BTreeMap<EventType, u8>,
}

impl WorkflowConfig {
    /// Build a dispatcher: built-in tables with these overrides applied.
    pub fn dispatcher(&self) -> WorkflowDispatcher {
        let mut dispatcher = WorkflowDispatcher::new();
        for (event_type, action) in &self.actions {
            dispatcher.set_action(*event_type, action.clone());
        }
        for (event_type, ordinal) in &self.priorities {
            dispatcher.set_priority(*event_type, *ordinal);
        }
        dispatcher
    }
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Non-neutral events per session before escalation. At least 1.
    pub tolerance_limit: u32,
    /// Profile used when a caller names none.
    pub default_profile: Option<String>,
    /// Profile files, each holding one profile or a list.
    pub profile_paths: Vec<PathBuf>,
    /// Vessel used for new sessions.
    pub vessel: VesselConfig,
    /// Periodic-driver interval in milliseconds.
    pub cycle_interval_ms: u64,
    /// Dispatcher table overrides.
    pub workflow: WorkflowConfig,
    /// Session journal capacity.
    pub journal_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance_limit: DEFAULT_TOLERANCE_LIMIT,
            default_profile: None,
            profile_paths: Vec::new(),
            vessel: VesselConfig::default(),
            cycle_interval_ms: DEFAULT_CYCLE_INTERVAL_MS,
            workflow: WorkflowConfig::default(),
            journal_capacity: SessionJournal::DEFAULT_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let mut config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Some("json") => {
                serde_json::from_str(&content).map_err(|source| ConfigError::JsonParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        if let Some(dir) = path.parent() {
            config.resolve_relative_to(dir);
        }
        config.validate()?;
        tracing::info!(
            path = %path.display(),
            profiles = config.profile_paths.len(),
            tolerance_limit = config.tolerance_limit,
            "engine configuration loaded"
        );
        Ok(config)
    }

    /// Resolve the config to use: `explicit`, else `$DPC_CONFIG`, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => {
                tracing::debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tolerance_limit == 0 {
            return Err(ValidationError::ZeroToleranceLimit.into());
        }
        if self.cycle_interval_ms == 0 {
            return Err(ConfigError::ZeroCycleInterval);
        }
        if self
            .default_profile
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ValidationError::EmptyProfileName.into());
        }
        Ok(())
    }

    /// Make relative profile paths relative to `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        for path in &mut self.profile_paths {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Periodic-driver interval.
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_millis(self.cycle_interval_ms)
    }
}
