//! Download locations for the piper release and the piper-voices models.

use super::error::BootstrapError;

/// Pinned piper release.
pub const PIPER_VERSION: &str = "v1.2.0";

const PIPER_RELEASES: &str = "https://github.com/rhasspy/piper/releases/download";
const VOICES_REPO: &str = "https://huggingface.co/rhasspy/piper-voices/resolve/main";

/// Release asset name for a Rust `os`/`arch` pair (see `std::env::consts`).
pub fn release_asset(os: &str, arch: &str) -> Option<&'static str> {
    if os != "linux" {
        return None;
    }
    match arch {
        "x86_64" => Some("piper_amd64.tar.gz"),
        "aarch64" => Some("piper_arm64.tar.gz"),
        "arm" => Some("piper_armv7.tar.gz"),
        _ => None,
    }
}

/// Release tarball URL for the host platform.
pub fn piper_release_url() -> Result<String, BootstrapError> {
    release_url_for(std::env::consts::OS, std::env::consts::ARCH)
}

pub fn release_url_for(os: &str, arch: &str) -> Result<String, BootstrapError> {
    let asset = release_asset(os, arch).ok_or_else(|| BootstrapError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    })?;
    Ok(format!("{PIPER_RELEASES}/{PIPER_VERSION}/{asset}"))
}

/// URLs of a voice's `.onnx` model and `.onnx.json` config.
///
/// Voices are stored as `<family>/<lang>/<speaker>/<quality>/<voice>.onnx`,
/// e.g. `zh/zh_CN/huayan/medium/zh_CN-huayan-medium.onnx`.
pub fn voice_urls(voice: &str) -> Result<(String, String), BootstrapError> {
    let invalid = || BootstrapError::InvalidVoice(voice.to_string());

    let mut parts = voice.splitn(3, '-');
    let (Some(lang), Some(speaker), Some(quality)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let family = lang.split('_').next().ok_or_else(invalid)?;
    if family.is_empty() || speaker.is_empty() || quality.is_empty() {
        return Err(invalid());
    }

    let base = format!("{VOICES_REPO}/{family}/{lang}/{speaker}/{quality}/{voice}");
    Ok((
        format!("{base}.onnx?download=true"),
        format!("{base}.onnx.json?download=true"),
    ))
}
