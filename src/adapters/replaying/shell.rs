//! Replaying adapter for the `ShellExecutor` port.

use std::sync::Mutex;

use tracing::warn;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::ExecError;
use crate::exec::Invocation;
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Replays recorded command results from a cassette.
///
/// Interactions are served in recorded order regardless of the command
/// requested. A mismatch between the recorded and requested command text is
/// logged, not rejected.
pub struct ReplayingShellExecutor {
    replayer: Mutex<CassetteReplayer>,
    issued: Mutex<Vec<String>>,
}

impl ReplayingShellExecutor {
    /// Creates a new replaying shell executor from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer), issued: Mutex::new(Vec::new()) }
    }

    /// Commands requested so far, with any escalation secret redacted.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().expect("issued lock poisoned").clone()
    }
}

impl ReplayingShellExecutor {
    /// Recorded interactions that have not been replayed yet.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().expect("replayer lock poisoned").remaining()
    }
}

impl ShellExecutor for ReplayingShellExecutor {
    fn run(&self, invocation: &Invocation) -> Result<ShellOutput, ExecError> {
        let requested = invocation.redacted();
        self.issued.lock().expect("issued lock poisoned").push(requested.clone());

        let (recorded, output) = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            let interaction = replayer.next_interaction();
            (
                interaction.input.get("command").and_then(serde_json::Value::as_str).map(String::from),
                interaction.output.clone(),
            )
        };
        if let Some(recorded) = recorded.filter(|r| *r != requested) {
            warn!(%recorded, %requested, "replayed command differs from recording");
        }

        decode_output(&output)
    }
}

/// Turns a recorded `{"ok": ...}` / `{"err": ...}` value back into a result.
///
/// Output that fits neither shape is a replay error, never a default run.
fn decode_output(output: &serde_json::Value) -> Result<ShellOutput, ExecError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(ExecError::Replay(msg));
    }
    let Some(ok) = output.get("ok") else {
        return Err(ExecError::Replay(format!("recorded output has no `ok` or `err` entry: {output}")));
    };
    serde_json::from_value(ok.clone())
        .map_err(|e| ExecError::Replay(format!("malformed recorded output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            host: "testhost".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    #[test]
    fn replaying_shell_run() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "shell".into(),
            method: "run".into(),
            input: json!({"command": "echo hello", "shell": false}),
            output: json!({"ok": {"exit_code": 0, "stdout": "hello\n", "stderr": ""}}),
        }]);
        let shell = ReplayingShellExecutor::new(replayer);
        let result = shell.run(&Invocation::new("echo hello")).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hello\n");
        assert_eq!(shell.issued(), vec!["echo hello"]);
        assert_eq!(shell.remaining(), 0);
    }

    #[test]
    fn replaying_shell_run_error() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "shell".into(),
            method: "run".into(),
            input: json!({"command": "bad_cmd"}),
            output: json!({"err": "command not found"}),
        }]);
        let shell = ReplayingShellExecutor::new(replayer);
        let result = shell.run(&Invocation::new("bad_cmd"));
        assert!(matches!(result, Err(ExecError::Replay(msg)) if msg == "command not found"));
    }

    #[test]
    fn wrongly_typed_output_is_a_replay_error() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "shell".into(),
            method: "run".into(),
            input: json!({}),
            output: json!({"ok": {"exit_code": "1", "stderr": "boom"}}),
        }]);
        let shell = ReplayingShellExecutor::new(replayer);
        let result = shell.run(&Invocation::new("systemctl enable nginx"));
        assert!(matches!(result, Err(ExecError::Replay(msg)) if msg.starts_with("malformed")));
    }

    #[test]
    fn output_without_ok_or_err_is_a_replay_error() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "shell".into(),
            method: "run".into(),
            input: json!({}),
            output: json!({"neither": true}),
        }]);
        let shell = ReplayingShellExecutor::new(replayer);
        assert!(matches!(shell.run(&Invocation::new("true")), Err(ExecError::Replay(_))));
    }

    #[test]
    fn missing_fields_default() {
        let replayer = make_replayer(vec![Interaction {
            seq: 0,
            port: "shell".into(),
            method: "run".into(),
            input: json!({}),
            output: json!({"ok": {"exit_code": 1}}),
        }]);
        let shell = ReplayingShellExecutor::new(replayer);
        let result = shell.run(&Invocation::new("false")).unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(result.stdout.is_empty());
    }
}
