//! Spawning of stage processes.

use std::process::Stdio;

use clipspeak_core::{Stage, StageCommand, TaskError, TaskId};
use tokio::process::{Child, Command};
use tracing::debug;

use super::stream::spawn_stream_reader;

/// Build the tokio command for one stage.
///
/// stdin and stderr are always piped. stdout is piped for the synthesizer so
/// its audio can be streamed onward and discarded for the player. The child
/// is killed if its handle is dropped without being reaped.
pub fn build_command(command: &StageCommand, stage: Stage) -> Command {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match stage {
        Stage::Synthesizer => cmd.stdout(Stdio::piped()),
        Stage::Player => cmd.stdout(Stdio::null()),
    };

    if let Some(dir) = &command.working_dir {
        cmd.current_dir(dir);
    }

    cmd
}

/// Spawn one stage and start forwarding its stderr to the log.
pub fn spawn_stage(command: &StageCommand, stage: Stage, task: TaskId) -> Result<Child, TaskError> {
    debug!(task = %task, %stage, command = %command.display(), "Spawning stage");

    let mut child = build_command(command, stage)
        .spawn()
        .map_err(|e| TaskError::spawn(stage, &e))?;

    if let Some(stderr) = child.stderr.take() {
        spawn_stream_reader(stderr, task, stage);
    }

    Ok(child)
}
