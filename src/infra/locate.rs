//! Package and toolchain location
//!
//! Grammar packages are resolved the way Node resolves a bare module name:
//! look for `node_modules/<name>/package.json` in the project directory and
//! each of its ancestors. When that fails the conventional
//! `<project>/node_modules/<name>` path is used instead.

use std::path::{Path, PathBuf};

use crate::config::defaults;

/// Resolves package names to directories on disk
#[derive(Debug, Clone)]
pub struct PackageLocator {
    /// Absolute project directory
    project_root: PathBuf,
    /// Name of the dependency directory (`node_modules`)
    dependency_dir: String,
}

impl PackageLocator {
    /// Create a locator rooted at `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            dependency_dir: defaults::DEPENDENCY_DIR.to_string(),
        }
    }

    /// Use a different dependency directory name
    #[must_use]
    pub fn with_dependency_dir(mut self, dependency_dir: impl Into<String>) -> Self {
        self.dependency_dir = dependency_dir.into();
        self
    }

    /// Resolve a package directory. Never fails; the path may not exist.
    pub fn locate(&self, name: &str) -> PathBuf {
        self.resolve(name).unwrap_or_else(|| self.conventional_path(name))
    }

    /// Module-resolution lookup: nearest ancestor holding the package
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.project_root
            .ancestors()
            .map(|dir| dir.join(&self.dependency_dir).join(name))
            .find(|candidate| candidate.join(defaults::PACKAGE_MANIFEST).is_file())
    }

    /// Fallback path used when resolution fails
    pub fn conventional_path(&self, name: &str) -> PathBuf {
        self.project_root.join(&self.dependency_dir).join(name)
    }

    /// Locate the toolchain executable
    ///
    /// Order: an explicit path, the binary shipped inside the resolved CLI
    /// package, `tree-sitter` on `PATH`, and finally the conventional
    /// location inside the dependency directory.
    pub fn toolchain(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        if let Some(package) = self.resolve(defaults::TOOLCHAIN_PACKAGE) {
            let binary = package.join(defaults::TOOLCHAIN_BINARY);
            if binary.is_file() {
                return binary;
            }
        }

        if let Ok(binary) = which::which(defaults::TOOLCHAIN_BINARY) {
            tracing::warn!(
                "{} package not found, using {} from PATH",
                defaults::TOOLCHAIN_PACKAGE,
                binary.display()
            );
            return binary;
        }

        self.conventional_path(defaults::TOOLCHAIN_PACKAGE)
            .join(defaults::TOOLCHAIN_BINARY)
    }
}
