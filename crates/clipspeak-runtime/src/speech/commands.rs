//! Stage command lines for piper and the raw PCM player.

use std::path::Path;

use clipspeak_core::{PiperPaths, SpeechSettings, StageCommand};

use crate::process::{ProcessPipe, StreamTransfer};

/// `piper --model <model> --output-raw`, run from the config root.
pub fn synthesizer_command(paths: &PiperPaths) -> StageCommand {
    StageCommand::new(paths.binary.clone())
        .arg("--model")
        .arg(paths.model.display().to_string())
        .arg("--output-raw")
        .current_dir(paths.root.clone())
}

/// `<player> -r <rate> -f S16_LE -t raw -`: mono 16-bit PCM from stdin.
pub fn player_command(player: &Path, sample_rate: u32) -> StageCommand {
    StageCommand::new(player)
        .arg("-r")
        .arg(sample_rate.to_string())
        .args(["-f", "S16_LE", "-t", "raw", "-"])
}

/// The piper → player pipe described by `settings`.
pub fn speech_pipe(paths: &PiperPaths, settings: &SpeechSettings) -> ProcessPipe {
    ProcessPipe::new(
        synthesizer_command(paths),
        player_command(&settings.player, settings.sample_rate),
    )
    .with_transfer(StreamTransfer::new(settings.transfer_chunk_size))
    .with_shutdown_grace(settings.shutdown_grace)
}
