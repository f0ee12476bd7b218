//! Profile loading errors.
//!
//! Every variant carries the file path so operators can locate the
//! offending catalogue without guesswork.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading compliance profiles from disk.
#[derive(Debug, Error)]
pub enum ProfileLoadError {
    /// The profile file does not exist.
    #[error("profile file not found: {path}")]
    FileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read profile file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// YAML parsing failed.
    #[error("failed to parse YAML profile at {path}: {source}")]
    YamlParse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON profile at {path}: {source}")]
    JsonParse {
        /// Offending file.
        path: PathBuf,
        /// Parser error.
        source: serde_json::Error,
    },
}

/// Result type alias for profile loading.
pub type LoadResult<T> = Result<T, ProfileLoadError>;
