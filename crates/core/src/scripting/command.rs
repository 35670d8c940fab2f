//! Input, output and error types for external process execution.

use std::time::Duration;

use serde_json::Value;

/// Everything needed to run one external process besides the program itself.
#[derive(Debug, Clone, Default)]
pub struct ScriptInput {
    /// Arguments appended after the program's own configured arguments.
    pub args: Vec<String>,
    /// Working directory for the child process (uses current dir if `None`).
    pub working_directory: Option<String>,
    /// Maximum wall-clock time before the process is killed. `None` waits
    /// forever.
    pub timeout: Option<Duration>,
}

/// Captured output from a finished process.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Stdout parsed as JSON, or `None` if stdout is not valid JSON.
    pub parsed_output: Option<Value>,
}

impl ScriptOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// The most useful error text the process produced: stderr when it wrote
    /// any, stdout otherwise.
    pub fn error_text(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// Errors that can occur while running an external process.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// No program was configured.
    #[error("No program configured")]
    EmptyCommand,

    /// The process exceeded its configured timeout and was killed.
    #[error("Process timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The process ran but exited with a non-zero exit code.
    #[error("Process failed with exit code {exit_code}: {stderr}")]
    ExecutionFailed { exit_code: i32, stderr: String },

    /// An I/O error occurred while spawning or communicating with the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> ScriptOutput {
        ScriptOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            duration_ms: 1,
            parsed_output: None,
        }
    }

    #[test]
    fn error_text_prefers_stderr() {
        let out = output("{\"success\": false}", "  boom\n", 1);
        assert_eq!(out.error_text(), "boom");
    }

    #[test]
    fn error_text_falls_back_to_stdout() {
        let out = output("  printed failure \n", "", 1);
        assert_eq!(out.error_text(), "printed failure");
        assert!(!out.succeeded());
    }

    #[test]
    fn display_timeout() {
        let err = ScriptError::Timeout { elapsed_ms: 5000 };
        assert_eq!(err.to_string(), "Process timed out after 5000ms");
    }

    #[test]
    fn display_execution_failed() {
        let err = ScriptError::ExecutionFailed {
            exit_code: 42,
            stderr: "segfault".to_string(),
        };
        assert_eq!(err.to_string(), "Process failed with exit code 42: segfault");
    }
}
