//! Locations of the piper binary and voice model under the config root.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Voice model shipped by default.
pub const DEFAULT_VOICE: &str = "zh_CN-huayan-medium";

/// Resolved piper asset paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PiperPaths {
    /// Config root the assets live under.
    pub root: PathBuf,
    /// Voice name, e.g. `zh_CN-huayan-medium`.
    pub voice: String,
    /// The `piper` executable (extracted from the release tarball).
    pub binary: PathBuf,
    /// The ONNX voice model.
    pub model: PathBuf,
    /// The voice model's JSON config (holds the sample rate).
    pub model_config: PathBuf,
}

impl PiperPaths {
    /// Lay out the default voice under `root`.
    pub fn new(root: &Path) -> Self {
        Self::with_voice(root, DEFAULT_VOICE)
    }

    /// Lay out `voice` under `root`.
    pub fn with_voice(root: &Path, voice: &str) -> Self {
        #[cfg(target_os = "windows")]
        let binary_name = "piper.exe";

        #[cfg(not(target_os = "windows"))]
        let binary_name = "piper";

        Self {
            root: root.to_path_buf(),
            voice: voice.to_string(),
            binary: root.join("piper").join(binary_name),
            model: root.join(format!("{voice}.onnx")),
            model_config: root.join(format!("{voice}.onnx.json")),
        }
    }

    /// Whether the binary and the model are both present.
    ///
    /// The model config is optional; a missing config only means the default
    /// sample rate is used.
    pub fn is_installed(&self) -> bool {
        self.binary.exists() && self.model.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn layout_matches_release_tarball() {
        let paths = PiperPaths::new(Path::new("/cfg"));
        assert_eq!(paths.voice, DEFAULT_VOICE);
        assert_eq!(paths.model, PathBuf::from("/cfg/zh_CN-huayan-medium.onnx"));
        assert_eq!(
            paths.model_config,
            PathBuf::from("/cfg/zh_CN-huayan-medium.onnx.json")
        );
        #[cfg(not(target_os = "windows"))]
        assert_eq!(paths.binary, PathBuf::from("/cfg/piper/piper"));
    }

    #[test]
    fn installed_requires_binary_and_model() {
        let temp = TempDir::new().unwrap();
        let paths = PiperPaths::new(temp.path());
        assert!(!paths.is_installed());

        fs::write(&paths.model, b"onnx").unwrap();
        assert!(!paths.is_installed());

        fs::create_dir_all(paths.binary.parent().unwrap()).unwrap();
        fs::write(&paths.binary, b"bin").unwrap();
        assert!(paths.is_installed());
    }
}
