//! CLI-specific error types and exit codes.

use clipspeak_core::{ChangeSourceError, PathError, TaskError};
use clipspeak_runtime::BootstrapError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error (paths, arguments).
    #[error("Configuration error: {0}")]
    Config(String),

    /// piper or the voice model could not be installed.
    #[error("Install failed: {0}")]
    Install(String),

    /// piper or the voice model is missing and installing was disabled.
    #[error("Not installed: {0}")]
    NotInstalled(String),

    /// The clipboard could not be opened.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Speaking failed.
    #[error("Speech failed: {0}")]
    Speech(String),

    /// Ctrl+C arrived before the command could finish.
    #[error("Interrupted")]
    Interrupted,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 78,       // EX_CONFIG
            Self::Install(_) => 69,      // EX_UNAVAILABLE
            Self::NotInstalled(_) => 72, // EX_OSFILE
            Self::Clipboard(_) => 69,    // EX_UNAVAILABLE
            Self::Speech(_) => 70,       // EX_SOFTWARE
            Self::Interrupted => 130,    // 128 + SIGINT
        }
    }
}

/// Exit code for an error returned from a handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<BootstrapError> for CliError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::UnsupportedPlatform { .. } | BootstrapError::InvalidVoice(_) => {
                Self::Config(err.to_string())
            }
            BootstrapError::Cancelled => Self::Interrupted,
            other => Self::Install(other.to_string()),
        }
    }
}

impl From<ChangeSourceError> for CliError {
    fn from(err: ChangeSourceError) -> Self {
        Self::Clipboard(err.to_string())
    }
}

impl From<TaskError> for CliError {
    fn from(err: TaskError) -> Self {
        Self::Speech(err.to_string())
    }
}
