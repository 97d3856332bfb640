//! Listen command handler: the clipboard watch loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use clipspeak_clipboard::ClipboardSource;
use clipspeak_core::ChangeSourcePort;
use clipspeak_runtime::{ChangeDispatchLoop, TaskSupervisor};
use tracing::info;

use super::prepare_pipe;
use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Speak every clipboard change until Ctrl+C.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let (pipe, settings) = prepare_pipe(ctx).await?;

    let source = Arc::new(ClipboardSource::new(settings.poll_interval));
    source
        .init()
        .await
        .map_err(CliError::from)
        .context("Failed to open the clipboard")?;

    let supervisor = TaskSupervisor::new(pipe, ctx.cancel.child_token());
    let dispatch = ChangeDispatchLoop::new(source.clone(), supervisor, settings.target_script)
        .with_shutdown_grace(settings.shutdown_grace * 2);

    println!("Listening on clipboard. Press Ctrl+C to exit.");
    let stats = dispatch.run(ctx.cancel.clone()).await;
    println!("\nExiting.");

    // The loop and its watch stream are gone, so this is the last reference
    if let Ok(source) = Arc::try_unwrap(source) {
        source.close().await;
    }

    info!(
        changes = stats.changes,
        spoken = stats.tasks_started,
        skipped = stats.skipped_empty,
        read_failures = stats.read_failures,
        "Stopped listening"
    );
    Ok(())
}
