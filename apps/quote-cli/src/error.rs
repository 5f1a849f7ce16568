//! # CLI Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in reshelf-quote                          │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  │                                      │
//! │  toml / env / values ──► ConfigError ──┼──► CliError ──► anyhow (main)  │
//! │                                  │                                      │
//! │  file read / JSON parse ─────────┘                                      │
//! │                                                                         │
//! │  main prints the chain and exits non-zero.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use reshelf_core::CoreError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

/// Top-level error for a CLI invocation.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Invalid argument {name}: {reason}")]
    InvalidArgument { name: String, reason: String },
}

impl CliError {
    /// Creates an invalid-argument error.
    pub fn invalid_argument(name: &str, reason: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
