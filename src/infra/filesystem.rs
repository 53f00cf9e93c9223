//! Filesystem operations
//!
//! Handles directory resets and artifact relocation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{FilesystemError, StepError};

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents; a missing directory is not an error
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        }),
    }
}

/// Delete `path` if present and recreate it empty
pub fn reset_dir(path: &Path) -> Result<(), FilesystemError> {
    remove_dir_all(path)?;
    create_dir_all(path)
}

/// Async variant of [`remove_dir_all`] used while other items are running
pub async fn remove_dir_all_async(path: &Path) -> Result<(), FilesystemError> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        }),
    }
}

/// Files directly inside `dir` with the given extension, sorted by name
pub fn find_artifacts(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut artifacts: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.extension().is_some_and(|ext| ext == extension))
        .collect();
    artifacts.sort();
    artifacts
}

/// Move every artifact in `work_dir` into `out_dir`
///
/// Returns the destination paths. Fails with [`StepError::NoArtifacts`] if
/// there is nothing to move.
pub fn relocate_artifacts(
    work_dir: &Path,
    out_dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, StepError> {
    let artifacts = find_artifacts(work_dir, extension);
    if artifacts.is_empty() {
        return Err(StepError::NoArtifacts {
            path: work_dir.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    let mut moved = Vec::with_capacity(artifacts.len());
    for from in artifacts {
        let Some(file_name) = from.file_name() else {
            continue;
        };
        let to = out_dir.join(file_name);
        move_file(&from, &to).map_err(|e| StepError::Relocate {
            from: from.clone(),
            to: to.clone(),
            error: e.to_string(),
        })?;
        moved.push(to);
    }
    Ok(moved)
}

/// Rename, falling back to copy + delete across filesystems
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)
}
