//! Document file access

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AssetError, AssetResult};

pub fn read_text(path: &Path) -> AssetResult<String> {
    fs::read_to_string(path).map_err(|e| AssetError::io(path, e))
}

/// Replace `path` with `contents` through a sibling temporary file, so a
/// failed write never leaves a truncated document behind.
pub fn write_atomic(path: &Path, contents: &str) -> AssetResult<()> {
    let temp = temp_path(path);

    if let Err(e) = fs::write(&temp, contents) {
        let _ = fs::remove_file(&temp);
        return Err(AssetError::io(path, e));
    }
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(AssetError::io(path, e));
    }

    log::debug!("wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
