//! Live shell executor backed by the command execution facade.

use crate::error::ExecError;
use crate::exec::{self, Invocation};
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Live shell executor that runs commands on the host.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ExecError> {
        exec::run_to_completion(invocation)
    }
}
