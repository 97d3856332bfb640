//! Paths command handler.
//!
//! Displays resolved piper paths for diagnostics.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use clipspeak_core::PiperPaths;

use crate::bootstrap::CliContext;

/// Print every resolved path in `key = value` format.
pub fn execute(ctx: &CliContext) -> Result<()> {
    print!("{}", render(&ctx.paths, ctx.speech_settings().sample_rate));
    Ok(())
}

fn render(paths: &PiperPaths, sample_rate: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "config_dir = {}", paths.root.display());
    let _ = writeln!(out, "voice = {}", paths.voice);
    for (key, path) in [
        ("piper", &paths.binary),
        ("model", &paths.model),
        ("model_config", &paths.model_config),
    ] {
        let _ = writeln!(out, "{key} = {}{}", path.display(), missing_marker(path));
    }
    let _ = writeln!(out, "sample_rate = {sample_rate}");
    out
}

fn missing_marker(path: &Path) -> &'static str {
    if path.exists() { "" } else { " (missing)" }
}
