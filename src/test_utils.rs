//! Test utilities
//!
//! A scripted [`CommandRunner`] and proptest generators.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ProcessError;
use crate::infra::process::{CommandOutput, CommandRunner, CommandSpec};

/// Failure injected for matching commands
#[derive(Debug, Clone)]
struct FailRule {
    subcommand: String,
    cwd_fragment: Option<String>,
    diagnostics: String,
}

impl FailRule {
    fn matches(&self, command: &CommandSpec) -> bool {
        command.args.iter().any(|a| a == &self.subcommand)
            && self
                .cwd_fragment
                .as_ref()
                .map_or(true, |f| command.cwd.to_string_lossy().contains(f.as_str()))
    }
}

/// Command runner that records calls instead of spawning processes
///
/// Successful `build` calls drop a `.wasm` file named after the working
/// directory; successful `clone` calls create the destination directory.
#[derive(Debug, Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<CommandSpec>>,
    rules: Vec<FailRule>,
}

impl FakeRunner {
    /// Runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command whose arguments include `subcommand`
    #[must_use]
    pub fn fail_when(mut self, subcommand: &str, diagnostics: &str) -> Self {
        self.rules.push(FailRule {
            subcommand: subcommand.to_string(),
            cwd_fragment: None,
            diagnostics: diagnostics.to_string(),
        });
        self
    }

    /// Fail `subcommand` only when the working directory contains `fragment`
    #[must_use]
    pub fn fail_in(mut self, fragment: &str, subcommand: &str, diagnostics: &str) -> Self {
        self.rules.push(FailRule {
            subcommand: subcommand.to_string(),
            cwd_fragment: Some(fragment.to_string()),
            diagnostics: diagnostics.to_string(),
        });
        self
    }

    /// Commands run so far, in call order
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose arguments include `subcommand`
    pub fn calls_for(&self, subcommand: &str) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.iter().any(|a| a == subcommand))
            .collect()
    }
}

/// Artifact file name the fake toolchain produces for a working directory
pub fn artifact_name(cwd: &Path) -> String {
    let base = cwd
        .file_name()
        .map_or_else(|| "parser".to_string(), |n| n.to_string_lossy().into_owned());
    if base.starts_with("tree-sitter-") {
        format!("{base}.wasm")
    } else {
        format!("tree-sitter-{base}.wasm")
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.clone());

        if let Some(rule) = self.rules.iter().find(|r| r.matches(command)) {
            return Ok(CommandOutput::failed(1, rule.diagnostics.clone()));
        }

        if command.args.iter().any(|a| a == "build") {
            std::fs::write(command.cwd.join(artifact_name(&command.cwd)), b"\0asm").map_err(
                |e| ProcessError::Spawn {
                    program: command.program_name(),
                    error: e.to_string(),
                },
            )?;
        }
        if command.args.iter().any(|a| a == "clone") {
            if let Some(dest) = command.args.last() {
                std::fs::create_dir_all(PathBuf::from(dest)).map_err(|e| ProcessError::Spawn {
                    program: command.program_name(),
                    error: e.to_string(),
                })?;
            }
        }

        Ok(CommandOutput::ok())
    }
}

/// Proptest generators
pub mod generators {
    use proptest::prelude::*;

    /// A grammar package name
    pub fn grammar_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,12}".prop_map(|lang| format!("tree-sitter-{lang}"))
    }

    /// A set of distinct grammar package names
    pub fn grammar_names(max: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::btree_set(grammar_name(), 0..=max)
            .prop_map(|set| set.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name(Path::new("/x/tsx")), "tree-sitter-tsx.wasm");
        assert_eq!(
            artifact_name(Path::new("/x/tree-sitter-json")),
            "tree-sitter-json.wasm"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_grammar_name_generator(name in grammar_name()) {
            prop_assert!(name.starts_with("tree-sitter-"));
            prop_assert!(crate::core::manifest::is_grammar(&name) || name == "tree-sitter-cli");
        }
    }
}
