//! Run configuration
//!
//! Settings are layered: built-in defaults, then the optional
//! `grammarforge.toml` in the project directory, then command-line flags
//! (which also pick up `GRAMMARFORGE_*` environment variables).
//!
//! ```toml
//! out_dir = "dist"
//! jobs = 4
//! timeout_secs = 900
//! pin_revision = true
//!
//! [recipes.tree-sitter-ocaml]
//! steps = [{ subpath = "grammars/ocaml" }, { subpath = "grammars/interface" }]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::config::defaults;
use crate::core::recipe::{BuildStep, Recipe, RecipeTable};
use crate::error::ConfigError;

/// Contents of `grammarforge.toml`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Output directory
    pub out_dir: Option<PathBuf>,
    /// Manifest path
    pub manifest: Option<PathBuf>,
    /// Dependency directory name
    pub dependency_dir: Option<String>,
    /// Toolchain executable
    pub toolchain: Option<PathBuf>,
    /// Parallel items
    pub jobs: Option<usize>,
    /// Per-command timeout in seconds, 0 disables
    pub timeout_secs: Option<u64>,
    /// Check out the manifest revision after a fetch override
    pub pin_revision: Option<bool>,
    /// Recipe overrides keyed by package name
    #[serde(default)]
    pub recipes: BTreeMap<String, RecipeConfig>,
}

/// Recipe entry in the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeConfig {
    /// Re-fetch from version control before building
    #[serde(default)]
    pub fetch: bool,
    /// Steps in order
    #[serde(default)]
    pub steps: Vec<BuildStep>,
}

impl FileConfig {
    /// Parse config text; `path` is only used in error messages
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Load a config file, using defaults when it does not exist
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Recipe overrides as a table
    pub fn recipe_table(&self) -> Result<RecipeTable, ConfigError> {
        let mut table = RecipeTable::new();
        for (name, entry) in &self.recipes {
            let recipe = Recipe::from_steps(entry.steps.clone())
                .ok_or_else(|| ConfigError::EmptyRecipe { name: name.clone() })?
                .with_fetch(entry.fetch);
            table.insert(name.clone(), recipe);
        }
        Ok(table)
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Output directory
    pub out_dir: Option<PathBuf>,
    /// Parallel items
    pub jobs: Option<usize>,
    /// Toolchain executable
    pub toolchain: Option<PathBuf>,
    /// Per-command timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Project directory (absolute)
    pub project_dir: PathBuf,
    /// Output directory (absolute)
    pub out_dir: PathBuf,
    /// Manifest path (absolute)
    pub manifest: PathBuf,
    /// Dependency directory name
    pub dependency_dir: String,
    /// Explicit toolchain executable
    pub toolchain: Option<PathBuf>,
    /// Parallel items
    pub jobs: usize,
    /// Per-command timeout
    pub timeout: Option<Duration>,
    /// Check out the manifest revision after a fetch override
    pub pin_revision: bool,
    /// Built-in recipes merged with config overrides
    pub recipes: RecipeTable,
}

impl Settings {
    /// Merge defaults, file config and command-line overrides
    pub fn resolve(
        project_dir: &Path,
        file: &FileConfig,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let out_dir = overrides
            .out_dir
            .or_else(|| file.out_dir.clone())
            .unwrap_or_else(|| PathBuf::from(defaults::OUT_DIR));
        let manifest = file
            .manifest
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::MANIFEST_FILE));
        let jobs = overrides
            .jobs
            .or(file.jobs)
            .filter(|&jobs| jobs > 0)
            .unwrap_or_else(num_cpus::get);
        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(defaults::COMMAND_TIMEOUT_SECS);

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            out_dir: project_dir.join(out_dir),
            manifest: project_dir.join(manifest),
            dependency_dir: file
                .dependency_dir
                .clone()
                .unwrap_or_else(|| defaults::DEPENDENCY_DIR.to_string()),
            toolchain: overrides
                .toolchain
                .or_else(|| file.toolchain.clone())
                .map(|path| resolve_program(project_dir, path)),
            jobs,
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            pin_revision: file.pin_revision.unwrap_or(true),
            recipes: RecipeTable::builtin().merged(file.recipe_table()?),
        })
    }
}

/// Paths with a separator are relative to the project; bare names stay as-is
/// so they are looked up on `PATH`.
fn resolve_program(project_dir: &Path, program: PathBuf) -> PathBuf {
    if program.components().count() > 1 {
        project_dir.join(program)
    } else {
        program
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
out_dir = "dist"
jobs = 3
timeout_secs = 0
pin_revision = false

[recipes.tree-sitter-ocaml]
fetch = true
steps = [{ subpath = "grammars/ocaml", generate = true }, { subpath = "grammars/interface" }]
"#;

    #[test]
    fn test_defaults_without_config() {
        let settings =
            Settings::resolve(Path::new("/proj"), &FileConfig::default(), Overrides::default())
                .unwrap();

        assert_eq!(settings.out_dir, PathBuf::from("/proj/out"));
        assert_eq!(settings.manifest, PathBuf::from("/proj/package.json"));
        assert_eq!(settings.dependency_dir, "node_modules");
        assert_eq!(settings.jobs, num_cpus::get());
        assert_eq!(settings.timeout, Some(Duration::from_secs(600)));
        assert!(settings.pin_revision);
        assert!(settings.toolchain.is_none());
        assert_eq!(settings.recipes.resolve("tree-sitter-typescript").steps().len(), 2);
    }

    #[test]
    fn test_file_config_is_applied() {
        let file = FileConfig::parse(SAMPLE, Path::new("grammarforge.toml")).unwrap();
        let settings = Settings::resolve(Path::new("/proj"), &file, Overrides::default()).unwrap();

        assert_eq!(settings.out_dir, PathBuf::from("/proj/dist"));
        assert_eq!(settings.jobs, 3);
        assert_eq!(settings.timeout, None);
        assert!(!settings.pin_revision);

        let recipe = settings.recipes.resolve("tree-sitter-ocaml");
        assert!(recipe.fetch());
        assert_eq!(recipe.steps().len(), 2);
        assert!(recipe.steps()[0].generate);
    }

    #[test]
    fn test_overrides_beat_file_config() {
        let file = FileConfig::parse(SAMPLE, Path::new("grammarforge.toml")).unwrap();
        let overrides = Overrides {
            out_dir: Some(PathBuf::from("/tmp/wasm")),
            jobs: Some(8),
            toolchain: Some(PathBuf::from("bin/tree-sitter")),
            timeout_secs: Some(30),
        };
        let settings = Settings::resolve(Path::new("/proj"), &file, overrides).unwrap();

        assert_eq!(settings.out_dir, PathBuf::from("/tmp/wasm"));
        assert_eq!(settings.jobs, 8);
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            settings.toolchain,
            Some(PathBuf::from("/proj/bin/tree-sitter"))
        );
    }

    #[test]
    fn test_zero_jobs_means_all_cpus() {
        let overrides = Overrides {
            jobs: Some(0),
            ..Overrides::default()
        };
        let settings =
            Settings::resolve(Path::new("/proj"), &FileConfig::default(), overrides).unwrap();
        assert_eq!(settings.jobs, num_cpus::get());
    }

    #[test]
    fn test_bare_toolchain_name_is_kept() {
        let overrides = Overrides {
            toolchain: Some(PathBuf::from("tree-sitter")),
            ..Overrides::default()
        };
        let settings =
            Settings::resolve(Path::new("/proj"), &FileConfig::default(), overrides).unwrap();
        assert_eq!(settings.toolchain, Some(PathBuf::from("tree-sitter")));
    }

    #[test]
    fn test_empty_recipe_is_rejected() {
        let file = FileConfig::parse(
            "[recipes.tree-sitter-bad]\nfetch = true\n",
            Path::new("grammarforge.toml"),
        )
        .unwrap();
        let result = Settings::resolve(Path::new("/proj"), &file, Overrides::default());
        assert!(matches!(result, Err(ConfigError::EmptyRecipe { .. })));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let result = FileConfig::parse("colour = true\n", Path::new("grammarforge.toml"));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let config = FileConfig::load_optional(Path::new("/no/such/grammarforge.toml")).unwrap();
        assert!(config.recipes.is_empty());
    }
}
