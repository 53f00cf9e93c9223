//! Fetch override
//!
//! Some grammar packages are not usable as published and must be rebuilt
//! from their repository. For those the cached package directory is thrown
//! away and re-cloned from the `source:owner/repo#revision` specifier in the
//! manifest.

use std::path::Path;

use crate::core::manifest::VcsSource;
use crate::error::FetchError;
use crate::infra::filesystem;
use crate::infra::git::GitOperations;

/// Re-acquire a package from version control
///
/// Fails without running anything if `spec` is not a VCS specifier.
pub async fn fetch_override(
    git: &GitOperations,
    package_dir: &Path,
    spec: &str,
    pin_revision: bool,
) -> Result<VcsSource, FetchError> {
    let source: VcsSource = spec.parse()?;

    filesystem::remove_dir_all_async(package_dir)
        .await
        .map_err(|e| FetchError::RemoveFailed {
            path: package_dir.to_path_buf(),
            error: e.to_string(),
        })?;

    let url = source.clone_url();
    tracing::info!("Cloning {url} into {}", package_dir.display());
    git.clone_repo(&url, package_dir).await?;

    if pin_revision {
        tracing::debug!("Checking out {} in {}", source.revision, package_dir.display());
        git.checkout(package_dir, &source.revision).await?;
    }

    Ok(source)
}
