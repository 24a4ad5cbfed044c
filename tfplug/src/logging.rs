//! Logging setup for provider processes
//!
//! Terraform captures a provider's stderr and filters it by the level named in
//! `TF_LOG_PROVIDER` (falling back to `TF_LOG`), so the subscriber installed
//! here writes plain text to stderr at that level.

use crate::error::{Result, TfplugError};
use std::str::FromStr;

/// Log level for the provider process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Reads `TF_LOG_PROVIDER`, then `TF_LOG`. Unset or unrecognised values
    /// yield `None`.
    pub fn from_env() -> Option<Self> {
        ["TF_LOG_PROVIDER", "TF_LOG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find_map(|value| value.parse().ok())
    }

    fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = TfplugError;

    fn from_str(s: &str) -> Result<Self> {
        // TF_LOG=JSON means "trace, structured"
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "JSON" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(TfplugError::LoggingError(format!(
                "unrecognised log level '{}'",
                other
            ))),
        }
    }
}

/// Installs the global fmt subscriber; fails if one is already installed
pub fn init_logging(level: LogLevel) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level.as_tracing())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| TfplugError::LoggingError(e.to_string()))
}

/// `init_logging` at the level from the environment, defaulting to Info
pub fn init_logging_from_env() -> Result<()> {
    init_logging(LogLevel::from_env().unwrap_or(LogLevel::Info))
}
