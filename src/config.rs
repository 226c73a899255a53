//! Shell configuration read from the environment.
//!
//! Only the binary reads these settings; the core types take explicit
//! arguments and never consult the environment.

use std::path::PathBuf;

use crate::domain::{is_valid_timestamp_format, DEFAULT_TIMESTAMP_FORMAT};

const LOG_MODE_ENV: &str = "BIOSECURE_LOG_MODE";
const LOG_FILE_ENV: &str = "BIOSECURE_LOG_FILE";
const TIMESTAMP_FORMAT_ENV: &str = "BIOSECURE_TIMESTAMP_FORMAT";

const DEFAULT_LOG_FILE: &str = "biosecure.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Settings for the terminal shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub timestamp_format: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl ShellConfig {
    /// Read settings from `BIOSECURE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_mode = lookup(LOG_MODE_ENV)
            .map(|v| LogMode::parse(&v))
            .unwrap_or(defaults.log_mode);

        let log_file = lookup(LOG_FILE_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(|v| PathBuf::from(v.trim()))
            .unwrap_or(defaults.log_file);

        // Logging is not up yet, so an invalid format falls back silently.
        let timestamp_format = lookup(TIMESTAMP_FORMAT_ENV)
            .filter(|v| is_valid_timestamp_format(v))
            .unwrap_or(defaults.timestamp_format);

        Self {
            log_mode,
            log_file,
            timestamp_format,
        }
    }
}
