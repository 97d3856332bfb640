//! CLI bootstrap - the composition root.
//!
//! Resolves paths and settings once; handlers receive the composed
//! [`CliContext`].

use anyhow::{Context, Result};
use clipspeak_core::{PiperPaths, SpeechSettings, config_root};
use clipspeak_runtime::piper::model_sample_rate_or_default;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::parser::SpeechArgs;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Explicit config root (`--config-dir`), if any.
    pub config_dir: Option<String>,
    /// Speech options from the command line.
    pub speech: SpeechArgs,
}

/// Composed context for command handlers.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Piper binary and voice model locations.
    pub paths: PiperPaths,
    /// Speech options from the command line.
    pub speech: SpeechArgs,
    /// Root token; cancelled on Ctrl+C.
    pub cancel: CancellationToken,
}

impl CliContext {
    /// Settings for the speech pipeline.
    ///
    /// Without `--sample-rate` the rate comes from the voice model config,
    /// so call this after the model is installed.
    pub fn speech_settings(&self) -> SpeechSettings {
        let sample_rate = self
            .speech
            .sample_rate
            .unwrap_or_else(|| model_sample_rate_or_default(&self.paths.model_config));
        self.speech.settings(sample_rate)
    }
}

/// Resolve paths and build the context.
pub fn bootstrap(config: CliConfig, cancel: CancellationToken) -> Result<CliContext> {
    let root = config_root(config.config_dir.as_deref())
        .map_err(CliError::from)
        .context("Failed to resolve config directory")?;

    Ok(CliContext {
        paths: PiperPaths::new(&root),
        speech: config.speech,
        cancel,
    })
}
