//! Command execution facade.
//!
//! Every wrapper in this crate funnels through [`Invocation`]: it carries the
//! command text, whether it goes through `sh -c`, where the child's output
//! streams go, and an optional [`EscalationSecret`]. Two execution modes are
//! offered:
//!
//! - [`run_to_completion`] blocks until the child exits and returns its
//!   captured output and exit status.
//! - [`run_streaming`] spawns the child and hands back a
//!   [`StreamingProcess`] the caller drains incrementally.
//!
//! Neither mode treats a nonzero exit status as an error. Deciding what
//! counts as success is left to the caller.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use crate::error::ExecError;
use crate::ports::shell::ShellOutput;

/// Interpreter used for shell-mode invocations.
const SHELL: &str = "sh";

/// Placeholder written in place of the escalation secret in logs and cassettes.
pub const REDACTED: &str = "***";

/// Where a child's output stream goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Capture {
    /// Collected by the facade and returned in the result.
    #[default]
    Piped,
    /// Shared with the parent process (printed straight to the terminal).
    Inherit,
}

impl Capture {
    fn stdio(self) -> Stdio {
        match self {
            Self::Piped => Stdio::piped(),
            Self::Inherit => Stdio::inherit(),
        }
    }
}

/// Credential piped into `sudo -S` when a command needs elevated privileges.
///
/// The secret is interpolated in plaintext into a shell pipeline. `Debug`
/// output never shows it.
#[derive(Clone, PartialEq, Eq)]
pub struct EscalationSecret(String);

impl EscalationSecret {
    /// Wraps a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns the secret text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EscalationSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EscalationSecret(***)")
    }
}

/// A single command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    command: String,
    shell: bool,
    stdout: Capture,
    stderr: Capture,
    secret: Option<EscalationSecret>,
}

impl Invocation {
    /// Creates an argv-mode invocation. The text is split on single spaces.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            shell: false,
            stdout: Capture::Piped,
            stderr: Capture::Piped,
            secret: None,
        }
    }

    /// Creates a shell-mode invocation run through `sh -c`.
    #[must_use]
    pub fn shell(command: impl Into<String>) -> Self {
        Self { shell: true, ..Self::new(command) }
    }

    /// Sets where stdout goes.
    #[must_use]
    pub fn stdout(mut self, capture: Capture) -> Self {
        self.stdout = capture;
        self
    }

    /// Sets where stderr goes.
    #[must_use]
    pub fn stderr(mut self, capture: Capture) -> Self {
        self.stderr = capture;
        self
    }

    /// Attaches an escalation secret, if any. Passing `None` leaves the
    /// invocation unprivileged.
    #[must_use]
    pub fn escalate(mut self, secret: Option<&EscalationSecret>) -> Self {
        self.secret = secret.cloned();
        self
    }

    /// The command text as given by the caller.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the command will run through the shell. Escalation forces it.
    #[must_use]
    pub fn is_shell(&self) -> bool {
        self.shell || self.secret.is_some()
    }

    /// Whether an escalation secret is attached.
    #[must_use]
    pub fn is_escalated(&self) -> bool {
        self.secret.is_some()
    }

    /// Applies the escalation and tokenization rules.
    #[must_use]
    pub fn prepare(&self) -> PreparedCommand {
        match &self.secret {
            Some(secret) => PreparedCommand::Shell(escalate_command(secret.expose(), &self.command)),
            None if self.shell => PreparedCommand::Shell(self.command.clone()),
            None => PreparedCommand::Argv(tokenize(&self.command)),
        }
    }

    /// The prepared command text with the secret replaced by [`REDACTED`].
    #[must_use]
    pub fn redacted(&self) -> String {
        if self.secret.is_some() {
            escalate_command(REDACTED, &self.command)
        } else {
            self.command.clone()
        }
    }
}

/// An invocation after escalation and tokenization have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedCommand {
    /// Text handed to `sh -c`.
    Shell(String),
    /// Program followed by its arguments.
    Argv(Vec<String>),
}

impl PreparedCommand {
    /// The program that will be launched.
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Shell(_) => SHELL,
            Self::Argv(argv) => argv.first().map_or("", String::as_str),
        }
    }

    fn to_command(&self) -> Command {
        match self {
            Self::Shell(text) => {
                let mut command = Command::new(SHELL);
                command.arg("-c").arg(text);
                command
            }
            Self::Argv(argv) => {
                let mut command = Command::new(self.program());
                command.args(argv.iter().skip(1));
                command
            }
        }
    }
}

/// Rewrites `command` so it runs under `sudo`, reading the secret from stdin.
#[must_use]
pub fn escalate_command(secret: &str, command: &str) -> String {
    format!("echo {secret} | sudo -S {command}")
}

/// Splits command text on single spaces.
///
/// There is no quoting support: an argument containing a space is split in
/// two, and consecutive spaces produce empty arguments.
#[must_use]
pub fn tokenize(command: &str) -> Vec<String> {
    command.split(' ').map(String::from).collect()
}

fn spawn(invocation: &Invocation) -> Result<Child, ExecError> {
    let prepared = invocation.prepare();
    debug!(
        command = %invocation.redacted(),
        shell = invocation.is_shell(),
        "running command"
    );
    prepared
        .to_command()
        .stdin(Stdio::null())
        .stdout(invocation.stdout.stdio())
        .stderr(invocation.stderr.stdio())
        .spawn()
        .map_err(|source| {
            warn!(program = %prepared.program(), error = %source, "failed to launch command");
            ExecError::Spawn { program: prepared.program().to_string(), source }
        })
}

/// Runs the invocation and blocks until the child exits.
///
/// Inherited streams come back as empty strings. A child killed by a signal
/// reports exit code `-1`.
///
/// # Errors
///
/// Returns [`ExecError::Spawn`] when the child cannot be started and
/// [`ExecError::Wait`] when collecting its output fails.
pub fn run_to_completion(invocation: &Invocation) -> Result<ShellOutput, ExecError> {
    let child = spawn(invocation)?;
    let output = child.wait_with_output().map_err(ExecError::Wait)?;
    let result = ShellOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    debug!(exit_code = result.exit_code, "command finished");
    Ok(result)
}

/// Starts the invocation without waiting for it.
///
/// # Errors
///
/// Returns [`ExecError::Spawn`] when the child cannot be started.
pub fn run_streaming(invocation: &Invocation) -> Result<StreamingProcess, ExecError> {
    spawn(invocation).map(|child| StreamingProcess { child })
}

/// A running child process started by [`run_streaming`].
///
/// When both stdout and stderr are piped the caller must keep reading them
/// while the child runs. A child that fills an undrained pipe buffer blocks
/// forever, and so does a caller waiting on it. Use
/// [`StreamingProcess::wait_with_output`] to drain both streams safely, or
/// set the stream you do not read to [`Capture::Inherit`].
#[derive(Debug)]
pub struct StreamingProcess {
    child: Child,
}

impl StreamingProcess {
    /// OS process id of the child.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Takes the piped stdout reader, if stdout was piped and not yet taken.
    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    /// Takes the piped stderr reader, if stderr was piped and not yet taken.
    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Iterates stdout line by line as the child writes it.
    ///
    /// Returns `None` if stdout was not piped or was already taken.
    pub fn stdout_lines(&mut self) -> Option<impl Iterator<Item = io::Result<String>>> {
        self.take_stdout().map(|out| BufReader::new(out).lines())
    }

    /// Waits for the child and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Wait`] if waiting fails.
    pub fn wait(&mut self) -> Result<i32, ExecError> {
        let status = self.child.wait().map_err(ExecError::Wait)?;
        Ok(status.code().unwrap_or(-1))
    }

    /// Waits for the child, collecting whatever remains on its piped streams.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Wait`] if reading output or waiting fails.
    pub fn wait_with_output(self) -> Result<ShellOutput, ExecError> {
        let output = self.child.wait_with_output().map_err(ExecError::Wait)?;
        Ok(ShellOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Kills the child.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Wait`] if the signal cannot be delivered.
    pub fn kill(&mut self) -> Result<(), ExecError> {
        self.child.kill().map_err(ExecError::Wait)
    }
}

/// Reads a stream to its end, decoding it as lossy UTF-8.
///
/// # Errors
///
/// Returns [`ExecError::Wait`] if reading fails.
pub fn read_all(mut reader: impl Read) -> Result<String, ExecError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(ExecError::Wait)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
