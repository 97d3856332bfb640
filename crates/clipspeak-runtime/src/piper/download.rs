//! Streaming downloads and archive extraction.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::error::BootstrapError;

/// Upper bound on establishing a connection to a download host.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client used for every bootstrap download.
pub fn download_client() -> Result<Client, BootstrapError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .map_err(BootstrapError::Client)
}

/// Download `url` to `dest`, drawing a progress bar on the terminal.
///
/// The body is streamed into `<dest>.part` and renamed on success, so an
/// interrupted download never looks like an installed file. When `cancel`
/// fires the request is dropped, the partial file is removed and
/// [`BootstrapError::Cancelled`] is returned.
pub async fn download_file(
    client: &Client,
    url: &str,
    dest: &Path,
    cancel: &CancellationToken,
) -> Result<(), BootstrapError> {
    info!(url, dest = %dest.display(), "Downloading");

    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        result = stream_to_file(client, url, dest) => Some(result),
    };

    match result {
        Some(result) => result.map_err(|source| BootstrapError::Download {
            url: url.to_string(),
            source,
        }),
        None => {
            let partial = partial_path(dest);
            if let Err(e) = fs::remove_file(&partial).await
                && e.kind() != std::io::ErrorKind::NotFound
            {
                tracing::debug!(path = %partial.display(), error = %e, "Could not remove partial download");
            }
            info!(url, "Download cancelled");
            Err(BootstrapError::Cancelled)
        }
    }
}

async fn stream_to_file(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let response = client
        .get(url)
        .header("User-Agent", "clipspeak")
        .send()
        .await
        .context("Failed to start download")?;

    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = progress_bar(total_size, file_label(dest));

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .context("Failed to create download directory")?;
    }

    let partial = partial_path(dest);
    let mut file = File::create(&partial)
        .await
        .context("Failed to create download file")?;

    let mut downloaded: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Error reading download stream")?;
        file.write_all(&chunk)
            .await
            .context("Error writing to download file")?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    file.flush().await.context("Error flushing download file")?;
    drop(file);

    fs::rename(&partial, dest)
        .await
        .context("Failed to move download into place")?;
    pb.finish_and_clear();

    info!(
        size_mb = downloaded / 1_048_576,
        dest = %dest.display(),
        "Download complete"
    );
    Ok(())
}

/// Download a `.tar.gz` archive into memory and unpack it into `dest_dir`.
pub async fn download_and_extract(
    client: &Client,
    url: &str,
    dest_dir: &Path,
    cancel: &CancellationToken,
) -> Result<(), BootstrapError> {
    let archive_path = dest_dir.join(archive_name(url));
    download_file(client, url, &archive_path, cancel).await?;

    let bytes = fs::read(&archive_path)
        .await
        .map_err(|e| BootstrapError::Extract {
            path: dest_dir.to_path_buf(),
            source: e.into(),
        })?;
    info!(size_mb = bytes.len() / 1_048_576, "Archive downloaded, extracting");

    // Extract in a blocking thread to avoid blocking the async runtime
    let dest_owned = dest_dir.to_path_buf();
    tokio::task::spawn_blocking(move || extract_tar_gz(&bytes, &dest_owned))
        .await
        .map_err(|e| BootstrapError::Extract {
            path: dest_dir.to_path_buf(),
            source: anyhow::anyhow!("Join error: {e}"),
        })??;

    if let Err(e) = fs::remove_file(&archive_path).await {
        tracing::debug!(path = %archive_path.display(), error = %e, "Could not remove archive");
    }

    info!(path = %dest_dir.display(), "Archive extracted successfully");
    Ok(())
}

/// Unpack gzip-compressed tar bytes into `dest_dir`.
pub fn extract_tar_gz(bytes: &[u8], dest_dir: &Path) -> Result<(), BootstrapError> {
    let decompressor = flate2::read::GzDecoder::new(Cursor::new(bytes));
    let mut archive = tar::Archive::new(decompressor);
    archive.set_preserve_permissions(true);
    archive
        .unpack(dest_dir)
        .map_err(|e| BootstrapError::Extract {
            path: dest_dir.to_path_buf(),
            source: e.into(),
        })
}

fn progress_bar(total: u64, label: String) -> ProgressBar {
    if total == 0 {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} {bytes}") {
            pb.set_style(style);
        }
        pb.set_message(label);
        return pb;
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
    ) {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb.set_message(label);
    pb
}

fn file_label(dest: &Path) -> String {
    dest.file_name()
        .map_or_else(|| dest.display().to_string(), |n| n.to_string_lossy().into_owned())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Last path segment of `url` without its query string.
fn archive_name(url: &str) -> &str {
    let path = url.split('?').next().unwrap_or(url);
    path.rsplit('/').next().filter(|s| !s.is_empty()).unwrap_or("piper.tar.gz")
}
