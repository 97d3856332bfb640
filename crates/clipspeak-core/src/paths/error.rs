//! Errors from resolving and preparing the config root.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to locate or prepare the directory holding piper and its voices.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine home directory to expand '~'")]
    NoHomeDir,

    /// The platform has no per-user config directory and none was given.
    #[error("Cannot determine a config directory; pass --config-dir or set CLIPSPEAK_CONFIG_DIR")]
    NoConfigDir,

    #[error("Config directory path is empty")]
    EmptyPath,

    /// Relative paths are resolved against the working directory.
    #[error("Cannot resolve relative path against the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    #[error("{} exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to create directory {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
