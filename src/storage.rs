use crate::error::SceneError;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub fn read_document(path: &Path) -> Result<String, SceneError> {
    fs::read_to_string(path).map_err(|source| io_error(path, source))
}

/// Writes `data` next to `path` first and renames it into place, so a failed
/// save never leaves a truncated file behind.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), SceneError> {
    let tmp = temp_path(path);
    if let Err(source) = fs::write(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error(&tmp, source));
    }
    atomic_rename(&tmp, path)
}

pub fn atomic_rename(from: &Path, to: &Path) -> Result<(), SceneError> {
    // Same-directory rename replaces the target in one step on Unix.
    if let Err(source) = fs::rename(from, to) {
        let _ = fs::remove_file(from);
        return Err(io_error(to, source));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> SceneError {
    SceneError::Io {
        path: path.to_path_buf(),
        source,
    }
}
