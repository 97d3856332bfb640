//! Voice model config (`<voice>.onnx.json`).

use std::path::Path;

use clipspeak_core::settings::DEFAULT_SAMPLE_RATE;
use tracing::{debug, warn};

use super::error::BootstrapError;

/// Read `audio.sample_rate` from a voice model config.
pub fn read_model_sample_rate(path: &Path) -> Result<u32, BootstrapError> {
    let invalid = |reason: String| BootstrapError::ModelConfig {
        path: path.to_path_buf(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let config: serde_json::Value =
        serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;

    let rate = config
        .get("audio")
        .and_then(|audio| audio.get("sample_rate"))
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| invalid("missing audio.sample_rate".to_string()))?;

    u32::try_from(rate)
        .ok()
        .filter(|r| *r > 0)
        .ok_or_else(|| invalid(format!("sample rate {rate} out of range")))
}

/// Sample rate for the player: the model's own rate, else the default.
pub fn model_sample_rate_or_default(path: &Path) -> u32 {
    match read_model_sample_rate(path) {
        Ok(rate) => {
            debug!(rate, path = %path.display(), "Using voice model sample rate");
            rate
        }
        Err(e) => {
            warn!(error = %e, fallback = DEFAULT_SAMPLE_RATE, "Falling back to default sample rate");
            DEFAULT_SAMPLE_RATE
        }
    }
}
