//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use grammarforge::error::ProcessError;
use grammarforge::infra::process::{CommandOutput, CommandRunner, CommandSpec};
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary project directory with a `package.json` and
/// installed grammar packages under `node_modules/`.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Write `package.json` with the given devDependencies
    pub fn write_manifest(&self, deps: &[(&str, &str)]) {
        let deps: serde_json::Map<String, serde_json::Value> = deps
            .iter()
            .map(|(name, spec)| ((*name).to_string(), serde_json::Value::from(*spec)))
            .collect();
        let manifest = serde_json::json!({
            "name": "grammars",
            "private": true,
            "devDependencies": deps,
        });
        self.create_file("package.json", &manifest.to_string());
    }

    /// Install a grammar package, creating the given subdirectories
    pub fn install(&self, name: &str, subdirs: &[&str]) -> PathBuf {
        let root = self.dir.path().join("node_modules").join(name);
        self.create_file(&format!("node_modules/{name}/package.json"), "{}");
        for sub in subdirs {
            std::fs::create_dir_all(root.join(sub)).expect("Failed to create subdirectory");
        }
        root
    }

    /// Files in the output directory, sorted
    pub fn output_files(&self, out: &str) -> Vec<String> {
        let dir = self.dir.path().join(out);
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to read output directory")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Install a shell script standing in for the tree-sitter CLI
    ///
    /// `build` writes `<dir>.wasm` into the working directory, except when
    /// the directory path contains "broken", where it fails.
    #[cfg(unix)]
    pub fn install_fake_toolchain(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join("bin").join("tree-sitter");
        self.create_file("bin/tree-sitter", FAKE_TOOLCHAIN);
        let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to make script executable");
        path
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Fake `tree-sitter` CLI
pub const FAKE_TOOLCHAIN: &str = r#"#!/bin/sh
case "$PWD" in
  *broken*) echo "error: broken grammar" >&2; exit 1 ;;
esac
case "$1" in
  generate) exit 0 ;;
  build)
    name=$(basename "$PWD")
    case "$name" in
      tree-sitter-*) ;;
      *) name="tree-sitter-$name" ;;
    esac
    printf 'wasm' > "$name.wasm"
    ;;
  *) echo "unknown command $1" >&2; exit 2 ;;
esac
"#;

/// Command runner that records calls instead of spawning processes
///
/// `build` drops `<dir>.wasm` in the working directory unless the directory
/// contains one of the failing fragments. `clone` creates its destination.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    failing: Vec<String>,
    failing_commands: Vec<String>,
}

impl RecordingRunner {
    /// Runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command run in a directory containing `fragment`
    pub fn failing_in(mut self, fragment: &str) -> Self {
        self.failing.push(fragment.to_string());
        self
    }

    /// Fail every invocation of `subcommand` (e.g. `clone`)
    pub fn failing_command(mut self, subcommand: &str) -> Self {
        self.failing_commands.push(subcommand.to_string());
        self
    }

    /// Commands run so far
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Commands run inside `dir`
    pub fn calls_in(&self, dir: &Path) -> Vec<CommandSpec> {
        self.calls()
            .into_iter()
            .filter(|c| c.cwd.starts_with(dir))
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.clone());

        let cwd = command.cwd.to_string_lossy();
        let subcommand = command.args.iter().find(|a| !a.starts_with('-') && !a.contains('='));
        if self.failing.iter().any(|f| cwd.contains(f.as_str()))
            || subcommand.is_some_and(|s| self.failing_commands.contains(s))
        {
            return Ok(CommandOutput::failed(1, "error: simulated failure"));
        }

        if command.args.first().map(String::as_str) == Some("build") {
            let base = command
                .cwd
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let name = if base.starts_with("tree-sitter-") {
                base
            } else {
                format!("tree-sitter-{base}")
            };
            std::fs::write(command.cwd.join(format!("{name}.wasm")), b"wasm").unwrap();
        } else if subcommand.map(String::as_str) == Some("clone") {
            if let Some(dest) = command.args.last() {
                std::fs::create_dir_all(dest).unwrap();
            }
        }
        Ok(CommandOutput::ok())
    }
}
