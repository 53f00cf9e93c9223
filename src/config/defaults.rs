//! Default configuration values

/// Output directory, relative to the project directory
pub const OUT_DIR: &str = "out";

/// Manifest listing the grammar packages
pub const MANIFEST_FILE: &str = "package.json";

/// Per-package manifest used to recognise a package root
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Directory holding installed packages
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Optional configuration file in the project directory
pub const CONFIG_FILE: &str = "grammarforge.toml";

/// Prefix shared by every grammar package name
pub const GRAMMAR_PREFIX: &str = "tree-sitter-";

/// Package that ships the toolchain binary
pub const TOOLCHAIN_PACKAGE: &str = "tree-sitter-cli";

/// Toolchain binary name
pub const TOOLCHAIN_BINARY: &str = "tree-sitter";

/// Dependencies that match the prefix but are not grammars
pub const NON_GRAMMAR_PACKAGES: &[&str] = &["tree-sitter", "tree-sitter-cli"];

/// Extension of compiled artifacts
pub const ARTIFACT_EXTENSION: &str = "wasm";

/// Per-command timeout in seconds (0 disables)
pub const COMMAND_TIMEOUT_SECS: u64 = 600;

/// Git executable used for fetch overrides
pub const GIT_BINARY: &str = "git";
