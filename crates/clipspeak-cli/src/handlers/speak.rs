//! Speak command handler: filter one text and speak it.

use anyhow::Result;
use clipspeak_core::{TaskState, filter_script};
use clipspeak_runtime::TaskSupervisor;
use tracing::info;

use super::prepare_pipe;
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Speak `text` once, waiting until playback ends or Ctrl+C.
pub async fn execute(ctx: &CliContext, text: &str) -> Result<()> {
    let Some(filtered) = filter_script(text, ctx.speech.script) else {
        println!("No {} characters found to speak.", ctx.speech.script);
        return Ok(());
    };

    let (pipe, settings) = prepare_pipe(ctx).await?;
    let mut supervisor = TaskSupervisor::new(pipe, ctx.cancel.child_token());
    let handle = supervisor.supersede(filtered);

    let state = handle.wait().await;
    supervisor.shutdown(settings.shutdown_grace * 2).await;

    match state {
        TaskState::Failed(err) => Err(CliError::from(err).into()),
        TaskState::Cancelled => {
            info!("Interrupted");
            Ok(())
        }
        _ => Ok(()),
    }
}
