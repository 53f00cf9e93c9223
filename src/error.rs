//! Error types for grammarforge
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// External command errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// Command could not be started
    #[error("Failed to run '{program}': {error}")]
    Spawn { program: String, error: String },

    /// Command exceeded its time budget and was killed
    #[error("'{program}' timed out after {secs}s in '{cwd}'")]
    TimedOut {
        program: String,
        cwd: PathBuf,
        secs: u64,
    },
}

/// Version specifier errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecifierError {
    /// Specifier is not of the form `source:owner/repo#revision`
    #[error("Malformed version specifier '{spec}': expected 'source:owner/repo#revision'")]
    Malformed { spec: String },

    /// Source host is not one we know how to clone from
    #[error("Unknown source '{host}' in version specifier '{spec}'")]
    UnknownHost { host: String, spec: String },
}

/// Fetch override errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Manifest entry cannot be fetched from version control
    #[error("Configuration error: {0}")]
    Config(#[from] SpecifierError),

    /// Cached package copy could not be removed
    #[error("Failed to remove '{path}': {error}")]
    RemoveFailed { path: PathBuf, error: String },

    /// Clone exited non-zero
    #[error("Failed to clone '{url}':\n{diagnostics}")]
    CloneFailed { url: String, diagnostics: String },

    /// Checkout of the pinned revision exited non-zero
    #[error("Failed to check out revision '{revision}':\n{diagnostics}")]
    CheckoutFailed {
        revision: String,
        diagnostics: String,
    },

    /// Git could not be run
    #[error(transparent)]
    Command(#[from] ProcessError),
}

/// Build step errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    /// Working directory does not exist
    #[error("Missing directory: {path}")]
    MissingDirectory { path: PathBuf },

    /// `generate` exited non-zero
    #[error("Generate failed in '{path}':\n{diagnostics}")]
    GenerateFailed { path: PathBuf, diagnostics: String },

    /// `build` exited non-zero
    #[error("Build failed in '{path}':\n{diagnostics}")]
    BuildFailed { path: PathBuf, diagnostics: String },

    /// Build succeeded but left nothing to publish
    #[error("Build in '{path}' produced no .{extension} artifacts")]
    NoArtifacts { path: PathBuf, extension: String },

    /// Artifact could not be moved into the output directory
    #[error("Failed to move '{from}' to '{to}': {error}")]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Toolchain could not be run
    #[error(transparent)]
    Command(#[from] ProcessError),
}

/// Manifest loading errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file could not be read
    #[error("Failed to read manifest '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Manifest file is not valid JSON
    #[error("Failed to parse manifest '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Config file is not valid TOML
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// Recipe override without any build step
    #[error("Recipe for '{name}' must have at least one step")]
    EmptyRecipe { name: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },
}
