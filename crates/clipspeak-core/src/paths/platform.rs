//! Platform-specific configuration root resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;

/// Environment variable overriding the configuration root.
pub const CONFIG_DIR_ENV: &str = "CLIPSPEAK_CONFIG_DIR";

/// Directory name under the system config dir.
///
/// Shared with QuickPiperAudiobook so both tools reuse one piper install and
/// one set of voice models.
pub const CONFIG_DIR_NAME: &str = "QuickPiperAudiobook";

/// Get the root directory holding the piper binary and voice models.
///
/// Resolution order:
/// 1. `explicit` (e.g. `--config-dir`)
/// 2. `CLIPSPEAK_CONFIG_DIR` environment variable
/// 3. System config directory (e.g. `~/.config/QuickPiperAudiobook`)
///
/// The directory is not created; see [`super::ensure_directory`].
pub fn config_root(explicit: Option<&str>) -> Result<PathBuf, PathError> {
    if let Some(raw) = explicit {
        return normalize_user_path(raw);
    }

    if let Ok(raw) = env::var(CONFIG_DIR_ENV) {
        if !raw.trim().is_empty() {
            return normalize_user_path(&raw);
        }
    }

    let config_dir = dirs::config_dir().ok_or(PathError::NoConfigDir)?;
    Ok(config_dir.join(CONFIG_DIR_NAME))
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(PathError::CurrentDir)
    }
}
