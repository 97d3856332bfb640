//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};
use clipspeak_core::settings::DEFAULT_PLAYER;
use clipspeak_core::{SpeechSettings, TargetScript};

use crate::commands::Commands;

/// Speak the Han characters of everything copied to the clipboard.
#[derive(Parser)]
#[command(name = "clipspeak")]
#[command(about = "Speak Chinese text copied to the clipboard with piper")]
#[command(version)]
pub struct Cli {
    /// Directory holding the piper binary and voice models
    #[arg(long = "config-dir", env = "CLIPSPEAK_CONFIG_DIR", global = true)]
    pub config_dir: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub speech: SpeechArgs,

    /// Defaults to `listen`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options shared by every command that speaks.
#[derive(Args, Debug, Clone)]
pub struct SpeechArgs {
    /// Script whose characters are spoken (han, hiragana, katakana, hangul, cyrillic)
    #[arg(long, env = "CLIPSPEAK_SCRIPT", default_value = "han", global = true)]
    pub script: TargetScript,

    /// How often the clipboard is checked, in milliseconds
    #[arg(
        long = "poll-interval-ms",
        env = "CLIPSPEAK_POLL_INTERVAL_MS",
        default_value_t = 1000,
        global = true
    )]
    pub poll_interval_ms: u64,

    /// Raw PCM player, invoked as `<player> -r <rate> -f S16_LE -t raw -`
    #[arg(long, env = "CLIPSPEAK_PLAYER", default_value = DEFAULT_PLAYER, global = true)]
    pub player: PathBuf,

    /// Player sample rate; read from the voice model config when omitted
    #[arg(long = "sample-rate", env = "CLIPSPEAK_SAMPLE_RATE", global = true)]
    pub sample_rate: Option<u32>,

    /// Time piper and the player get to exit after SIGTERM, in milliseconds
    #[arg(
        long = "shutdown-grace-ms",
        env = "CLIPSPEAK_SHUTDOWN_GRACE_MS",
        default_value_t = 2000,
        global = true
    )]
    pub shutdown_grace_ms: u64,

    /// Do not download piper or the voice model when missing
    #[arg(long = "skip-install", env = "CLIPSPEAK_SKIP_INSTALL", global = true)]
    pub skip_install: bool,
}

impl SpeechArgs {
    /// Settings for the pipeline, given the sample rate to use.
    pub fn settings(&self, sample_rate: u32) -> SpeechSettings {
        SpeechSettings {
            target_script: self.script,
            sample_rate,
            player: self.player.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            shutdown_grace: Duration::from_millis(self.shutdown_grace_ms),
            ..SpeechSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["clipspeak", "--verbose", "--config-dir", "/tmp/piper", "paths"]);
        assert!(cli.verbose);
        assert_eq!(cli.config_dir, Some("/tmp/piper".to_string()));
        assert!(matches!(cli.command, Some(Commands::Paths)));
    }

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::parse_from(["clipspeak"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.speech.script, TargetScript::Han);
        assert_eq!(cli.speech.poll_interval_ms, 1000);
        assert_eq!(cli.speech.player, PathBuf::from("aplay"));
        assert!(cli.speech.sample_rate.is_none());
        assert!(!cli.speech.skip_install);
    }

    #[test]
    fn test_speech_args_after_subcommand() {
        let cli = Cli::parse_from([
            "clipspeak",
            "speak",
            "你好",
            "--player",
            "paplay",
            "--sample-rate",
            "16000",
        ]);
        match cli.command {
            Some(Commands::Speak { text }) => assert_eq!(text, "你好"),
            _ => panic!("expected speak"),
        }
        assert_eq!(cli.speech.player, PathBuf::from("paplay"));
        assert_eq!(cli.speech.sample_rate, Some(16_000));
    }

    #[test]
    fn test_unknown_script_is_rejected() {
        assert!(Cli::try_parse_from(["clipspeak", "--script", "latin"]).is_err());
        let cli = Cli::parse_from(["clipspeak", "--script", "Hangul", "listen"]);
        assert_eq!(cli.speech.script, TargetScript::Hangul);
    }

    #[test]
    fn test_settings_from_args() {
        let cli = Cli::parse_from(["clipspeak", "--poll-interval-ms", "250"]);
        let settings = cli.speech.settings(22_050);
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.shutdown_grace, Duration::from_secs(2));
        assert_eq!(settings.sample_rate, 22_050);
    }

    #[test]
    fn test_every_speech_flag_reads_env() {
        let cmd = Cli::command();
        for id in [
            "script",
            "poll_interval_ms",
            "player",
            "sample_rate",
            "shutdown_grace_ms",
            "skip_install",
        ] {
            let arg = cmd
                .get_arguments()
                .find(|a| a.get_id() == id)
                .unwrap_or_else(|| panic!("missing argument {id}"));
            let env = arg
                .get_env()
                .unwrap_or_else(|| panic!("{id} has no env var"))
                .to_string_lossy()
                .into_owned();
            assert_eq!(env, format!("CLIPSPEAK_{}", id.to_uppercase()));
        }
    }
}
