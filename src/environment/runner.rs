//! Shell command execution, with a mock for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

/// Captured result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status 0
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout.
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for command runners, allowing mock injection for tests.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` through the shell inside `dir`.
    ///
    /// Returns `Err` only when the command could not be started at all.
    fn run(&self, dir: &Path, command: &str) -> Result<CommandOutput, String>;
}

/// Runs commands with `sh -c`.
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, dir: &Path, command: &str) -> Result<CommandOutput, String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(dir)
            .output()
            .map_err(|e| format!("Failed to execute '{command}': {e}"))?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Mock command runner for testing.
///
/// Commands succeed with empty output unless a scripted output is registered
/// for them. Every invocation is recorded.
#[derive(Default)]
pub struct MockCommandRunner {
    outputs: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl MockCommandRunner {
    /// Creates a runner where every command succeeds silently.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the output of `command`.
    #[must_use]
    pub fn with_output(mut self, command: &str, output: CommandOutput) -> Self {
        self.outputs.insert(command.to_string(), output);
        self
    }

    /// Commands run so far, with their working directories.
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, dir: &Path, command: &str) -> Result<CommandOutput, String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((dir.to_path_buf(), command.to_string()));
        }
        Ok(self
            .outputs
            .get(command)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_runner_captures_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = RealCommandRunner
            .run(temp_dir.path(), "echo hello && echo oops 1>&2")
            .unwrap();

        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    fn test_real_runner_runs_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("marker.txt"), "x").unwrap();

        let output = RealCommandRunner.run(temp_dir.path(), "ls").unwrap();
        assert!(output.stdout.contains("marker.txt"));
    }

    #[test]
    fn test_real_runner_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let output = RealCommandRunner.run(temp_dir.path(), "exit 3").unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
    }

    #[test]
    fn test_mock_runner_records_calls() {
        let runner = MockCommandRunner::new().with_output("fail", CommandOutput::failed(1, "no"));

        assert!(runner.run(Path::new("/a"), "ok").unwrap().success);
        assert!(!runner.run(Path::new("/b"), "fail").unwrap().success);
        assert_eq!(
            runner.calls(),
            vec![
                (PathBuf::from("/a"), "ok".to_string()),
                (PathBuf::from("/b"), "fail".to_string()),
            ]
        );
    }
}
