//! Filesystem helpers used around a package build.
use std::io;
use std::path::Path;

use crate::error::FsError;

/// Ensure `dir` exists, creating it and any missing ancestors.
///
/// # Errors
///
/// Returns [`FsError::CreateDir`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<(), FsError> {
    std::fs::create_dir_all(dir).map_err(|source| FsError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Move the file at `from` to `to`, replacing any existing file at `to`.
///
/// A plain rename is attempted first. Temporary build directories usually
/// live on a different filesystem than the workspace, where rename fails,
/// so the fallback copies the file and then removes the source.
///
/// # Errors
///
/// Returns [`FsError::Move`] if neither rename nor copy-and-remove succeeds.
pub fn move_file(from: &Path, to: &Path) -> Result<(), FsError> {
    let wrap = |source: io::Error| FsError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to).map_err(wrap)?;
    std::fs::remove_file(from).map_err(wrap)
}

/// List the file names directly inside `dir`, sorted. Unreadable entries are skipped.
#[must_use]
pub fn list_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
