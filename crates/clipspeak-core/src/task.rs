//! Speech task lifecycle types.
//!
//! A speech task is one attempt to speak one filtered text. These types are
//! shared between the runtime (which drives tasks) and adapters that only
//! observe them.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Identifier of a speech task, unique within one supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the two external processes in a speech pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Converts text on stdin into raw PCM on stdout.
    Synthesizer,
    /// Plays raw PCM read from stdin.
    Player,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synthesizer => write!(f, "synthesizer"),
            Self::Player => write!(f, "player"),
        }
    }
}

/// Why a speech task failed.
///
/// Cancellation is deliberately absent: a superseded task ends in
/// [`TaskState::Cancelled`], which is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum TaskError {
    /// A stage process could not be started.
    #[error("failed to spawn {stage}: {reason}")]
    Spawn { stage: Stage, reason: String },

    /// Writing text or streaming audio failed.
    #[error("{stage} stream failed: {reason}")]
    Stream { stage: Stage, reason: String },

    /// A stage exited unsuccessfully.
    #[error("{stage} exited unsuccessfully ({status})")]
    Exit { stage: Stage, status: String },
}

impl TaskError {
    /// Stage the error is attributed to.
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Spawn { stage, .. } | Self::Stream { stage, .. } | Self::Exit { stage, .. } => {
                *stage
            }
        }
    }

    /// Build a spawn error from an I/O error.
    pub fn spawn(stage: Stage, err: &std::io::Error) -> Self {
        Self::Spawn {
            stage,
            reason: err.to_string(),
        }
    }

    /// Build a stream error from an I/O error.
    pub fn stream(stage: Stage, err: &std::io::Error) -> Self {
        Self::Stream {
            stage,
            reason: err.to_string(),
        }
    }
}

/// Lifecycle state of a speech task.
///
/// `Created → Running → {Completed, Cancelled, Failed}`; a task may also go
/// straight from `Created` to `Cancelled` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum TaskState {
    /// Task exists but its processes have not been spawned.
    Created,
    /// Both stage processes are running.
    Running,
    /// Both stages exited cleanly after the whole stream was transferred.
    Completed,
    /// The task was superseded or the program is shutting down.
    Cancelled,
    /// Spawn, stream or exit failure.
    Failed(TaskError),
}

impl TaskState {
    /// Whether no further transitions can happen.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed(_))
    }

    /// Short lowercase label for logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "failed: {err}"),
            other => f.write_str(other.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!TaskState::Created.is_terminal());
        assert!(!TaskState::Running.is_terminal());
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Cancelled.is_terminal());
        let failed = TaskState::Failed(TaskError::Exit {
            stage: Stage::Player,
            status: "exit status: 1".to_string(),
        });
        assert!(failed.is_terminal());
    }

    #[test]
    fn spawn_error_mentions_stage_and_reason() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory");
        let err = TaskError::spawn(Stage::Synthesizer, &io);
        assert_eq!(err.stage(), Stage::Synthesizer);
        assert_eq!(
            err.to_string(),
            "failed to spawn synthesizer: No such file or directory"
        );
    }

    #[test]
    fn failed_state_display_includes_error() {
        let state = TaskState::Failed(TaskError::Stream {
            stage: Stage::Player,
            reason: "Broken pipe".to_string(),
        });
        assert_eq!(state.to_string(), "failed: player stream failed: Broken pipe");
        assert_eq!(state.label(), "failed");
    }

    #[test]
    fn task_id_display() {
        assert_eq!(TaskId(7).to_string(), "#7");
    }
}
