//! External process execution
//!
//! Every subprocess the orchestrator starts (toolchain and git) goes through
//! [`CommandRunner`], so build logic can be exercised with a fake runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProcessError;

/// A command to run in a specific working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute
    pub program: PathBuf,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// Create a command with no arguments
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name as shown in logs
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status and captured output of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured stderr followed by stdout
    pub diagnostics: String,
}

impl CommandOutput {
    /// Successful output with no diagnostics
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            diagnostics: String::new(),
        }
    }

    /// Failed output with the given exit code and diagnostics
    pub fn failed(code: i32, diagnostics: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            diagnostics: diagnostics.into(),
        }
    }
}

/// Capability to run external commands
#[async_trait]
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    /// Run a command to completion
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not as
    /// an error. Errors are reserved for commands that never produced an exit
    /// status.
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError>;
}

/// Runs commands as real subprocesses on the tokio runtime
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner without a time limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        tracing::debug!("Running `{command}` in {}", command.cwd.display());

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        let child = cmd.output();

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(ProcessError::TimedOut {
                        program: command.program_name(),
                        cwd: command.cwd.clone(),
                        secs: limit.as_secs(),
                    })
                }
            },
            None => child.await,
        }
        .map_err(|e| ProcessError::Spawn {
            program: command.program_name(),
            error: e.to_string(),
        })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            diagnostics: collect_diagnostics(&output.stderr, &output.stdout),
        })
    }
}

/// Join stderr and stdout into a single diagnostic text
fn collect_diagnostics(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stdout = String::from_utf8_lossy(stdout);
    match (stderr.trim().is_empty(), stdout.trim().is_empty()) {
        (true, true) => String::new(),
        (false, true) => stderr.trim_end().to_string(),
        (true, false) => stdout.trim_end().to_string(),
        (false, false) => format!("{}\n{}", stderr.trim_end(), stdout.trim_end()),
    }
}

/// Check whether a path exists without blocking the runtime
pub async fn dir_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}
