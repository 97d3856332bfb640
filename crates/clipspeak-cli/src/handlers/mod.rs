//! Command handlers.

pub mod install;
pub mod listen;
pub mod paths;
pub mod speak;

use anyhow::{Context, Result};
use clipspeak_core::SpeechSettings;
use clipspeak_runtime::{ProcessPipe, ensure_piper_installed, speech_pipe};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Make sure piper is installed, then build the speech pipe.
pub(crate) async fn prepare_pipe(ctx: &CliContext) -> Result<(ProcessPipe, SpeechSettings)> {
    if ctx.speech.skip_install {
        if !ctx.paths.is_installed() {
            return Err(CliError::NotInstalled(format!(
                "piper or the voice model is missing under {} (run `clipspeak install`)",
                ctx.paths.root.display()
            ))
            .into());
        }
    } else {
        ensure_piper_installed(&ctx.paths, false, &ctx.cancel)
            .await
            .map_err(CliError::from)
            .context("Failed to install piper")?;
    }

    let settings = ctx.speech_settings();
    tracing::debug!(?settings, "Speech settings resolved");
    Ok((speech_pipe(&ctx.paths, &settings), settings))
}
