//! Two-stage external process pipeline.
//!
//! The synthesizer reads one line of text on stdin and writes raw PCM on
//! stdout; the player reads raw PCM on stdin. [`ProcessPipe`] describes the
//! two commands, [`RunningPipe`] owns the spawned children for one task.

use std::process::ExitStatus;
use std::time::Duration;

use clipspeak_core::settings::DEFAULT_SHUTDOWN_GRACE;
use clipspeak_core::{FilteredText, Stage, StageCommand, TaskError, TaskId, TaskState};
use futures_util::future::{join, try_join};
use tokio::io::AsyncWriteExt;
use tokio::process::Child;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::command::spawn_stage;
use super::shutdown::shutdown_child;
use super::transfer::StreamTransfer;

/// Synthesizer and player commands plus the knobs shared by every run.
#[derive(Debug, Clone)]
pub struct ProcessPipe {
    synthesizer: StageCommand,
    player: StageCommand,
    transfer: StreamTransfer,
    grace: Duration,
}

impl ProcessPipe {
    pub fn new(synthesizer: StageCommand, player: StageCommand) -> Self {
        Self {
            synthesizer,
            player,
            transfer: StreamTransfer::default(),
            grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    #[must_use]
    pub const fn with_transfer(mut self, transfer: StreamTransfer) -> Self {
        self.transfer = transfer;
        self
    }

    /// Time each stage gets between SIGTERM and SIGKILL.
    #[must_use]
    pub const fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub const fn synthesizer(&self) -> &StageCommand {
        &self.synthesizer
    }

    pub const fn player(&self) -> &StageCommand {
        &self.player
    }

    pub const fn shutdown_grace(&self) -> Duration {
        self.grace
    }

    /// Spawn both stages.
    ///
    /// If the player cannot be spawned the synthesizer is terminated and
    /// reaped before the error is returned.
    pub async fn spawn(&self, task: TaskId) -> Result<RunningPipe, TaskError> {
        let mut synthesizer = spawn_stage(&self.synthesizer, Stage::Synthesizer, task)?;

        let player = match spawn_stage(&self.player, Stage::Player, task) {
            Ok(child) => child,
            Err(err) => {
                if let Err(e) = shutdown_child(&mut synthesizer, self.grace).await {
                    warn!(task = %task, error = %e, "Failed to reap synthesizer after player spawn failure");
                }
                return Err(err);
            }
        };

        Ok(RunningPipe {
            task,
            synthesizer,
            player,
            transfer: self.transfer,
            grace: self.grace,
        })
    }
}

/// Both stage processes of one task, spawned and not yet reaped.
#[derive(Debug)]
pub struct RunningPipe {
    task: TaskId,
    synthesizer: Child,
    player: Child,
    transfer: StreamTransfer,
    grace: Duration,
}

impl RunningPipe {
    /// Feed `text`, stream the audio and wait for both stages to exit.
    ///
    /// Every suspension point races `cancel`. Whatever the outcome, both
    /// processes are reaped before this returns.
    pub async fn drive(self, text: &FilteredText, cancel: &CancellationToken) -> TaskState {
        let Self {
            task,
            mut synthesizer,
            mut player,
            transfer,
            grace,
        } = self;

        let (Some(mut text_in), Some(audio_out), Some(audio_in)) = (
            synthesizer.stdin.take(),
            synthesizer.stdout.take(),
            player.stdin.take(),
        ) else {
            terminate_both(task, &mut synthesizer, &mut player, grace).await;
            return TaskState::Failed(TaskError::Stream {
                stage: Stage::Synthesizer,
                reason: "stage stdio was not captured".to_string(),
            });
        };

        let mut line = String::with_capacity(text.as_str().len() + 1);
        line.push_str(text.as_str());
        line.push('\n');

        let feed = async move {
            text_in
                .write_all(line.as_bytes())
                .await
                .map_err(|e| TaskError::stream(Stage::Synthesizer, &e))?;
            text_in
                .shutdown()
                .await
                .map_err(|e| TaskError::stream(Stage::Synthesizer, &e))?;
            // Dropping the handle closes the synthesizer's stdin
            drop(text_in);
            Ok::<(), TaskError>(())
        };
        let copy = transfer.run(audio_out, audio_in);

        let streamed = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            result = try_join(feed, copy) => Some(result),
        };

        match streamed {
            None => {
                terminate_both(task, &mut synthesizer, &mut player, grace).await;
                return TaskState::Cancelled;
            }
            Some(Err(err)) => {
                terminate_both(task, &mut synthesizer, &mut player, grace).await;
                // A stage killed by a concurrent cancel breaks the pipe too
                if cancel.is_cancelled() {
                    return TaskState::Cancelled;
                }
                return TaskState::Failed(err);
            }
            Some(Ok(((), bytes))) => {
                debug!(task = %task, bytes, "Audio stream transferred");
            }
        }

        let exited = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            statuses = join(synthesizer.wait(), player.wait()) => Some(statuses),
        };

        let Some((synthesizer_status, player_status)) = exited else {
            terminate_both(task, &mut synthesizer, &mut player, grace).await;
            return TaskState::Cancelled;
        };

        if cancel.is_cancelled() {
            return TaskState::Cancelled;
        }

        match classify_exit(Stage::Synthesizer, synthesizer_status)
            .and_then(|()| classify_exit(Stage::Player, player_status))
        {
            Ok(()) => TaskState::Completed,
            Err(err) => {
                // One stage may still be running if the other's wait failed
                terminate_both(task, &mut synthesizer, &mut player, grace).await;
                TaskState::Failed(err)
            }
        }
    }
}

fn classify_exit(stage: Stage, status: std::io::Result<ExitStatus>) -> Result<(), TaskError> {
    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(TaskError::Exit {
            stage,
            status: status.to_string(),
        }),
        Err(e) => Err(TaskError::Exit {
            stage,
            status: e.to_string(),
        }),
    }
}

/// Shut down both stages concurrently and reap them.
async fn terminate_both(task: TaskId, synthesizer: &mut Child, player: &mut Child, grace: Duration) {
    let (synthesizer_result, player_result) = join(
        shutdown_child(synthesizer, grace),
        shutdown_child(player, grace),
    )
    .await;

    for (stage, result) in [
        (Stage::Synthesizer, synthesizer_result),
        (Stage::Player, player_result),
    ] {
        match result {
            Ok(status) => debug!(task = %task, %stage, %status, "Stage reaped"),
            Err(e) => warn!(task = %task, %stage, error = %e, "Failed to shut down stage"),
        }
    }
}
