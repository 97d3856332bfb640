//! Install command handler.

use anyhow::{Context, Result};
use clipspeak_runtime::{InstallOutcome, ensure_piper_installed};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Download piper and the voice model.
pub async fn execute(ctx: &CliContext, force: bool) -> Result<()> {
    let outcome = ensure_piper_installed(&ctx.paths, force, &ctx.cancel)
        .await
        .map_err(CliError::from)
        .context("Failed to install piper")?;

    match outcome {
        InstallOutcome::AlreadyInstalled => {
            println!("piper is already installed in {}", ctx.paths.root.display());
            println!("Use --force to download it again.");
        }
        InstallOutcome::Installed => {
            println!("Installed piper and {} in {}", ctx.paths.voice, ctx.paths.root.display());
        }
    }
    Ok(())
}
