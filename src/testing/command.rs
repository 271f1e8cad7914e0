//! Script building and shell execution
//!
//! Fixture scripts and test steps are either a single command line or an
//! ordered list of them. Lists are joined into one script so that a step can
//! rely on state (working directory, shell variables) left by the previous
//! one.

use std::process::{Command, ExitStatus, Stdio};

use serde::Deserialize;

use crate::common::config::ShellConfig;
use crate::common::{Error, Result};

/// Separator placed between the commands of a sequence
pub const STATEMENT_SEPARATOR: &str = ";";

/// A command script as written in a Testfile
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Script {
    /// A single command line, run unchanged
    Single(String),
    /// An ordered list of command lines
    Sequence(Vec<String>),
}

impl Script {
    /// Build the script text handed to the interpreter
    ///
    /// No quoting or escaping is applied.
    pub fn build(&self) -> String {
        match self {
            Script::Single(command) => command.clone(),
            Script::Sequence(commands) => commands.join(STATEMENT_SEPARATOR),
        }
    }
}

impl From<&str> for Script {
    fn from(command: &str) -> Self {
        Script::Single(command.to_string())
    }
}

impl From<Vec<&str>> for Script {
    fn from(commands: Vec<&str>) -> Self {
        Script::Sequence(commands.into_iter().map(str::to_string).collect())
    }
}

/// Captured outcome of one script execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Standard output, trimmed
    pub stdout: String,
    /// Standard error, trimmed
    pub stderr: String,
    /// Exit status of the interpreter
    pub status: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Something that can execute a built script
///
/// The engine only talks to this trait, so tests can substitute a recorder
/// for the real shell.
pub trait CommandRunner {
    /// Run `script` to completion and capture its output.
    ///
    /// An `Err` means the script could not be started at all.
    fn run(&mut self, script: &str) -> Result<ExecutionResult>;
}

/// Runs scripts through a shell interpreter, e.g. `sh -c <script>`
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: ShellConfig,
}

impl ShellRunner {
    pub fn new(shell: ShellConfig) -> Self {
        Self { shell }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl CommandRunner for ShellRunner {
    fn run(&mut self, script: &str) -> Result<ExecutionResult> {
        tracing::debug!(shell = %self.shell.program, script, "Executing script");

        let output = Command::new(&self.shell.program)
            .args(&self.shell.args)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::spawn(&self.shell.program, script, e))?;

        let result = ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            status: exit_code(output.status),
        };

        tracing::debug!(status = result.status, "Script finished");
        Ok(result)
    }
}

/// Integer exit status, mapping signal termination to `128 + signal`
///
/// This follows the shell's `$?` convention rather than reporting a negative
/// signal number, so a killed interpreter shows e.g. `137` for SIGKILL in the
/// failure line and as the exit code of a failed one-time fixture. Any
/// signal exit therefore stays non-zero and fits a process exit code.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
