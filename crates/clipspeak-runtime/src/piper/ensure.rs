//! Install piper and the voice model on first run.

use clipspeak_core::{PiperPaths, ensure_directory};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::download::{download_and_extract, download_client, download_file};
use super::error::BootstrapError;
use super::release::{piper_release_url, voice_urls};

/// What [`ensure_piper_installed`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Binary and model were already present.
    AlreadyInstalled,
    /// At least one asset was downloaded.
    Installed,
}

/// Make sure the piper binary and the voice model exist under `paths.root`.
///
/// Nothing is downloaded when both are present, unless `force` is set. The
/// model config is fetched alongside the model but is not required for the
/// install to count as complete.
///
/// Every download races `cancel`; a cancelled install returns
/// [`BootstrapError::Cancelled`] and leaves no partial files behind.
pub async fn ensure_piper_installed(
    paths: &PiperPaths,
    force: bool,
    cancel: &CancellationToken,
) -> Result<InstallOutcome, BootstrapError> {
    if !force && paths.is_installed() {
        info!(root = %paths.root.display(), "Piper and model already exist, skipping download");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    // Resolve every URL up front so an unsupported platform fails before any I/O
    let release_url = piper_release_url()?;
    let (model_url, config_url) = voice_urls(&paths.voice)?;

    if cancel.is_cancelled() {
        return Err(BootstrapError::Cancelled);
    }

    ensure_directory(&paths.root)?;
    let client = download_client()?;

    if force || !paths.binary.exists() {
        info!(url = %release_url, "Installing piper");
        download_and_extract(&client, &release_url, &paths.root, cancel).await?;
    }

    if force || !paths.model.exists() {
        download_file(&client, &model_url, &paths.model, cancel).await?;
    }

    if force || !paths.model_config.exists() {
        download_file(&client, &config_url, &paths.model_config, cancel).await?;
    }

    for required in [&paths.binary, &paths.model] {
        if !required.exists() {
            return Err(BootstrapError::Incomplete(required.clone()));
        }
    }

    info!(root = %paths.root.display(), voice = %paths.voice, "Piper installed");
    Ok(InstallOutcome::Installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn present_assets_skip_download() {
        let temp = TempDir::new().unwrap();
        let paths = PiperPaths::new(temp.path());
        fs::create_dir_all(paths.binary.parent().unwrap()).unwrap();
        fs::write(&paths.binary, b"bin").unwrap();
        fs::write(&paths.model, b"onnx").unwrap();

        let outcome = ensure_piper_installed(&paths, false, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
    }

    #[tokio::test]
    async fn invalid_voice_fails_before_downloading() {
        let temp = TempDir::new().unwrap();
        let paths = PiperPaths::with_voice(&temp.path().join("cfg"), "nonsense");

        let err = ensure_piper_installed(&paths, false, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::InvalidVoice(_) | BootstrapError::UnsupportedPlatform { .. }
        ));
        // No directory is created when the install cannot start
        assert!(!paths.root.exists());
    }

    #[tokio::test]
    async fn cancelled_install_touches_nothing() {
        if crate::piper::piper_release_url().is_err() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let paths = PiperPaths::new(&temp.path().join("cfg"));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = ensure_piper_installed(&paths, false, &cancel).await.unwrap_err();
        assert!(matches!(err, BootstrapError::Cancelled));
        assert!(!paths.root.exists());
    }
}
