//! Shell executor port for running external commands.

use serde::{Deserialize, Serialize};

use crate::error::ExecError;
use crate::exec::Invocation;

/// The output of a command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellOutput {
    /// The exit code of the process (`-1` when killed by a signal).
    pub exit_code: i32,
    /// The captured standard output, decoded as UTF-8.
    pub stdout: String,
    /// The captured standard error, decoded as UTF-8.
    pub stderr: String,
}

impl ShellOutput {
    /// Returns `true` when the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns `true` when the exit code is one of `codes`.
    ///
    /// Some tools report partial success with a nonzero code.
    #[must_use]
    pub fn exited_with_any(&self, codes: &[i32]) -> bool {
        codes.contains(&self.exit_code)
    }
}

/// Executes commands.
///
/// Abstracting execution lets every wrapper run against canned output
/// recorded in a cassette instead of the real system.
pub trait ShellExecutor: Send + Sync {
    /// Runs an invocation to completion and returns its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be launched or waited on.
    /// A nonzero exit status is not an error.
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ExecError>;
}
