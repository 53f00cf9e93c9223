//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::defaults;
use crate::core::config::{FileConfig, Overrides, Settings};
use output::OutputConfig;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("VERGEN_GIT_SHA"),
    "\nbuilt:  ",
    env!("VERGEN_BUILD_TIMESTAMP"),
);

/// Grammarforge - compile tree-sitter grammars to WebAssembly
///
/// Builds every `tree-sitter-*` grammar listed in the project's package.json
/// and collects the resulting .wasm files in a single output directory.
#[derive(Parser, Debug)]
#[command(name = "grammarforge")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    /// Only build grammars whose name contains this text
    pub filter: Option<String>,

    /// Number of grammars built in parallel (defaults to the CPU count)
    #[arg(short, long, env = "GRAMMARFORGE_JOBS")]
    pub jobs: Option<usize>,

    /// Output directory for .wasm files
    #[arg(short, long, env = "GRAMMARFORGE_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Project directory containing package.json
    #[arg(short = 'C', long, env = "GRAMMARFORGE_PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Configuration file (defaults to grammarforge.toml in the project)
    #[arg(long, env = "GRAMMARFORGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// tree-sitter executable to use
    #[arg(long, env = "GRAMMARFORGE_TOOLCHAIN")]
    pub toolchain: Option<PathBuf>,

    /// Per-command timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS", env = "GRAMMARFORGE_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Print the resolved build plan without building
    #[arg(long)]
    pub list: bool,

    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    ///
    /// Returns `false` when at least one grammar failed to build.
    pub async fn run(self, output: &OutputConfig) -> Result<bool> {
        let settings = self.settings()?;

        if self.list {
            commands::list::execute(&settings, self.filter.as_deref(), output)?;
            return Ok(true);
        }

        let report = commands::build::execute(&settings, self.filter.as_deref(), output).await?;
        Ok(!report.has_errors())
    }

    /// Resolve settings from the config file and flags
    fn settings(&self) -> Result<Settings> {
        let current_dir = std::env::current_dir()?;
        let project_dir = self
            .project_dir
            .as_ref()
            .map_or_else(|| current_dir.clone(), |dir| current_dir.join(dir));

        let file = match &self.config {
            Some(path) => FileConfig::load(&current_dir.join(path))?,
            None => FileConfig::load_optional(&project_dir.join(defaults::CONFIG_FILE))?,
        };

        let overrides = Overrides {
            out_dir: self.out_dir.as_ref().map(|dir| current_dir.join(dir)),
            jobs: self.jobs,
            toolchain: self
                .toolchain
                .as_ref()
                .map(|program| cli_program(&current_dir, program)),
            timeout_secs: self.timeout,
        };

        Settings::resolve(&project_dir, &file, overrides).context("Invalid configuration")
    }
}

/// Like `--out-dir`, a toolchain path given on the command line is relative
/// to the current directory; bare names are left for `PATH` lookup.
fn cli_program(current_dir: &Path, program: &Path) -> PathBuf {
    if program.components().count() > 1 {
        current_dir.join(program)
    } else {
        program.to_path_buf()
    }
}
