//! Build recipes
//!
//! A recipe is the ordered list of build steps for one grammar package plus
//! the decision whether the package must be re-fetched from version control
//! first. Most packages use [`Recipe::default`]; the exceptions live in
//! [`RecipeTable::builtin`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One toolchain invocation against a working directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildStep {
    /// Directory relative to the package root (root when absent)
    #[serde(default)]
    pub subpath: Option<String>,
    /// Run `generate` before building
    #[serde(default)]
    pub generate: bool,
}

impl BuildStep {
    /// Build the package root
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a subdirectory of the package
    pub fn subpath(subpath: impl Into<String>) -> Self {
        Self {
            subpath: Some(subpath.into()),
            generate: false,
        }
    }

    /// Run `generate` before this step's build
    #[must_use]
    pub fn with_generate(mut self) -> Self {
        self.generate = true;
        self
    }

    /// Working directory for this step
    pub fn work_dir(&self, package_dir: &Path) -> PathBuf {
        match &self.subpath {
            Some(sub) => package_dir.join(sub),
            None => package_dir.to_path_buf(),
        }
    }

    /// Label used in logs: `name` or `name/subpath`
    pub fn label(&self, name: &str) -> String {
        match &self.subpath {
            Some(sub) => format!("{name}/{sub}"),
            None => name.to_string(),
        }
    }
}

/// Ordered, non-empty list of build steps with a fetch-override decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    fetch: bool,
    steps: Vec<BuildStep>,
}

impl Default for Recipe {
    fn default() -> Self {
        Self::single(BuildStep::root())
    }
}

impl Recipe {
    /// Recipe with exactly one step
    pub fn single(step: BuildStep) -> Self {
        Self {
            fetch: false,
            steps: vec![step],
        }
    }

    /// Recipe from a list of steps; `None` if the list is empty
    pub fn from_steps(steps: Vec<BuildStep>) -> Option<Self> {
        if steps.is_empty() {
            None
        } else {
            Some(Self {
                fetch: false,
                steps,
            })
        }
    }

    /// Re-fetch the package from version control before building
    #[must_use]
    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Whether a fetch override runs before the steps
    pub fn fetch(&self) -> bool {
        self.fetch
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }
}

/// Mapping from package name to its non-default recipe
#[derive(Debug, Clone, Default)]
pub struct RecipeTable {
    entries: HashMap<String, Recipe>,
}

impl RecipeTable {
    /// Empty table: every package resolves to the default recipe
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipes for the grammars that need special handling
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for name in ["tree-sitter-agda", "tree-sitter-elixir", "tree-sitter-query"] {
            table.insert(name, Recipe::default().with_fetch(true));
        }
        for name in ["tree-sitter-perl", "tree-sitter-latex", "tree-sitter-swift"] {
            table.insert(name, Recipe::single(BuildStep::root().with_generate()));
        }
        table.insert("tree-sitter-php", Recipe::single(BuildStep::subpath("php")));
        table.insert(
            "tree-sitter-typescript",
            Recipe {
                fetch: false,
                steps: vec![BuildStep::subpath("typescript"), BuildStep::subpath("tsx")],
            },
        );
        table.insert(
            "tree-sitter-xml",
            Recipe {
                fetch: false,
                steps: vec![BuildStep::subpath("xml"), BuildStep::subpath("dtd")],
            },
        );
        table.insert(
            "tree-sitter-markdown",
            Recipe {
                fetch: false,
                steps: vec![
                    BuildStep::subpath("tree-sitter-markdown"),
                    BuildStep::subpath("tree-sitter-markdown-inline"),
                ],
            },
        );
        table
    }

    /// Add or replace a recipe
    pub fn insert(&mut self, name: impl Into<String>, recipe: Recipe) {
        self.entries.insert(name.into(), recipe);
    }

    /// Replace entries with those from `other`
    #[must_use]
    pub fn merged(mut self, other: RecipeTable) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Recipe for `name`, falling back to the default
    pub fn resolve(&self, name: &str) -> Recipe {
        self.entries.get(name).cloned().unwrap_or_default()
    }

}
