//! Speech pipeline settings.
//!
//! Immutable values handed to the runtime by the composition root. Nothing in
//! here touches the filesystem or the environment.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::script::TargetScript;

/// Sample rate of the bundled voice model, used when its config cannot be read.
pub const DEFAULT_SAMPLE_RATE: u32 = 22_050;

/// How often the clipboard is polled for changes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Time a stage gets to exit after SIGTERM before it is killed.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Buffer size for the synthesizer → player transfer.
pub const DEFAULT_TRANSFER_CHUNK: usize = 8 * 1024;

/// Default audio player binary.
pub const DEFAULT_PLAYER: &str = "aplay";

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCommand {
    /// Program to execute (absolute path or a name looked up in `PATH`).
    pub program: PathBuf,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
    /// Working directory, if it must differ from ours.
    pub working_dir: Option<PathBuf>,
}

impl StageCommand {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the program from `dir`.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// The command line as a single string, for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Settings for the speech pipeline and its dispatch loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Script whose characters are spoken.
    pub target_script: TargetScript,
    /// Sample rate shared by synthesizer output and player input.
    pub sample_rate: u32,
    /// Player binary (name or path).
    pub player: PathBuf,
    /// Clipboard polling interval.
    pub poll_interval: Duration,
    /// SIGTERM → SIGKILL grace period for stage processes.
    pub shutdown_grace: Duration,
    /// Buffer size for streaming synthesizer output into the player.
    pub transfer_chunk_size: usize,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            target_script: TargetScript::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            player: PathBuf::from(DEFAULT_PLAYER),
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            transfer_chunk_size: DEFAULT_TRANSFER_CHUNK,
        }
    }
}
