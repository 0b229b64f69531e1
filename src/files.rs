//! Small file helpers shared by the snapshot and the reminder spool.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `<path>.<suffix>`, keeping the existing extension.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

pub(crate) fn temp_path(path: &Path) -> PathBuf {
    sibling(path, "tmp")
}

pub(crate) fn backup_path(path: &Path) -> PathBuf {
    sibling(path, "bak")
}

/// Replace `path` with `data`. The bytes go to `<path>.tmp` first and are
/// renamed into place, so a reader sees either the old file or the new one.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}

/// Copy `path` to `<path>.bak`, replacing an older backup.
pub(crate) fn back_up(path: &Path) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    fs::copy(path, &backup)?;
    Ok(backup)
}
