//! Main commands enum.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the clipboard and speak each new text (default)
    Listen,

    /// Speak one text and exit
    Speak {
        /// Text to speak; only characters of the target script are kept
        text: String,
    },

    /// Download piper and the voice model
    Install {
        /// Download again even if already installed
        #[arg(long)]
        force: bool,
    },

    /// Show resolved paths for piper and the voice model
    Paths,
}
