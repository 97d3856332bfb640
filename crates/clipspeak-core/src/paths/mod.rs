//! Path utilities for the piper install and voice models.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - OS-specific logic is kept private in `platform`

mod ensure;
mod error;
mod piper;
mod platform;

// Error type
pub use error::PathError;

// Config root
pub use platform::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, config_root, normalize_user_path};

// Piper assets
pub use piper::{DEFAULT_VOICE, PiperPaths};

// Directory operations
pub use ensure::ensure_directory;
