//! Recording adapter for the `ShellExecutor` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::ExecError;
use crate::exec::Invocation;
use crate::ports::{ShellExecutor, ShellOutput};

/// Records shell interactions while delegating to an inner implementation.
///
/// The escalation secret never reaches the cassette; the recorded command
/// text carries a placeholder instead.
pub struct RecordingShellExecutor {
    inner: Box<dyn ShellExecutor>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingShellExecutor {
    /// Creates a new recording shell executor wrapping the given implementation.
    pub fn new(inner: Box<dyn ShellExecutor>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Cassette input recorded for each invocation.
#[derive(Serialize)]
pub(crate) struct CommandInput {
    pub(crate) command: String,
    pub(crate) shell: bool,
}

impl CommandInput {
    pub(crate) fn from_invocation(invocation: &Invocation) -> Self {
        Self { command: invocation.redacted(), shell: invocation.is_shell() }
    }
}

impl ShellExecutor for RecordingShellExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ExecError> {
        let result = self.inner.run(invocation);
        self.record(invocation, &result);
        result
    }
}

impl RecordingShellExecutor {
    /// Appends one interaction using the ok/err convention that
    /// `ReplayingShellExecutor::run` reads back: `{"ok": output}` for a
    /// command that ran, `{"err": message}` for one that could not.
    fn record(&self, invocation: &Invocation, result: &Result<ShellOutput, ExecError>) {
        let input = serde_json::to_value(CommandInput::from_invocation(invocation))
            .expect("failed to serialize recording input");
        let output = match result {
            Ok(output) => {
                let inner = serde_json::to_value(output).expect("failed to serialize shell output");
                serde_json::json!({ "ok": inner })
            }
            Err(e) => serde_json::json!({ "err": e.to_string() }),
        };
        self.recorder.lock().expect("recorder lock poisoned").record("shell", "run", input, output);
    }
}
