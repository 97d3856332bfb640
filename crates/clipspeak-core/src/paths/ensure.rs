//! Directory creation utilities.

use std::fs;
use std::path::Path;

use super::error::PathError;

/// Ensure `path` exists and is a directory, creating it (and parents) if missing.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|source| PathError::Create {
        path: path.to_path_buf(),
        source,
    })
}
