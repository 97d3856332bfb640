//! Errors raised while installing piper and its voice model.

use std::path::PathBuf;

use clipspeak_core::PathError;
use thiserror::Error;

/// Bootstrap failures. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No piper release exists for this OS/architecture.
    #[error("No piper release available for {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// The voice name does not follow `<lang>_<REGION>-<speaker>-<quality>`.
    #[error("Invalid voice name: {0}")]
    InvalidVoice(String),

    /// The config directory could not be prepared.
    #[error(transparent)]
    Directory(#[from] PathError),

    /// A download failed.
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// The release archive could not be unpacked.
    #[error("Failed to extract piper archive into {}: {source}", .path.display())]
    Extract {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Installation finished but an expected file is missing.
    #[error("{} is missing after installation", .0.display())]
    Incomplete(PathBuf),

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The install was interrupted; partial downloads were discarded.
    #[error("Install cancelled")]
    Cancelled,

    /// The voice model config could not be read.
    #[error("Invalid voice model config {}: {reason}", .path.display())]
    ModelConfig { path: PathBuf, reason: String },
}
