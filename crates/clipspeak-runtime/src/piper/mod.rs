//! Piper bootstrap: release download, voice model download, model config.

mod download;
mod ensure;
mod error;
mod model;
mod release;

pub use download::{
    CONNECT_TIMEOUT, download_and_extract, download_client, download_file, extract_tar_gz,
};
pub use ensure::{InstallOutcome, ensure_piper_installed};
pub use error::BootstrapError;
pub use model::{model_sample_rate_or_default, read_model_sample_rate};
pub use release::{PIPER_VERSION, piper_release_url, release_asset, release_url_for, voice_urls};
