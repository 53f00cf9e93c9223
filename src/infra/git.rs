//! Git operations
//!
//! Clones repositories and checks out revisions by running `git` through a
//! [`CommandRunner`]. Shelling out instead of linking a git library keeps
//! fetch behind the same runner as the toolchain, so clone failures surface
//! with git's own diagnostics and tests can fake them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::defaults;
use crate::error::FetchError;
use crate::infra::process::{CommandRunner, CommandSpec};

/// Git repository operations
#[derive(Debug, Clone)]
pub struct GitOperations {
    runner: Arc<dyn CommandRunner>,
    git: PathBuf,
}

impl GitOperations {
    /// Create git operations backed by `runner`
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            git: PathBuf::from(defaults::GIT_BINARY),
        }
    }

    /// Clone `url` into `dest`
    ///
    /// `dest` must not exist; its parent is created if needed.
    pub async fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let parent = dest.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FetchError::CloneFailed {
                url: url.to_string(),
                diagnostics: format!("cannot create '{}': {e}", parent.display()),
            })?;

        let command = CommandSpec::new(&self.git, parent)
            .arg("clone")
            .arg("--quiet")
            .arg(url)
            .arg(dest.display().to_string());

        let output = self.runner.run(&command).await?;
        if output.success {
            Ok(())
        } else {
            Err(FetchError::CloneFailed {
                url: url.to_string(),
                diagnostics: output.diagnostics,
            })
        }
    }

    /// Check out `revision` (detached) in the repository at `repo`
    pub async fn checkout(&self, repo: &Path, revision: &str) -> Result<(), FetchError> {
        let command = CommandSpec::new(&self.git, repo)
            .arg("-c")
            .arg("advice.detachedHead=false")
            .arg("checkout")
            .arg("--quiet")
            .arg("--detach")
            .arg(revision);

        let output = self.runner.run(&command).await?;
        if output.success {
            Ok(())
        } else {
            Err(FetchError::CheckoutFailed {
                revision: revision.to_string(),
                diagnostics: output.diagnostics,
            })
        }
    }
}
