//! Canned-output helpers for unit tests.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use crate::adapters::replaying::ReplayingShellExecutor;
use crate::cassette::format::{Cassette, Interaction};
use crate::cassette::replayer::CassetteReplayer;
use crate::context::ServiceContext;
use crate::exec::EscalationSecret;

/// Recorded output of a command that ran.
pub(crate) fn out(exit_code: i32, stdout: &str, stderr: &str) -> Value {
    json!({ "ok": { "exit_code": exit_code, "stdout": stdout, "stderr": stderr } })
}

/// Recorded output of a command that could not be launched.
pub(crate) fn fail(message: &str) -> Value {
    json!({ "err": message })
}

/// Builds a context that replays `outputs` in order, plus a handle for
/// inspecting the commands the code under test issued.
pub(crate) fn replay(outputs: Vec<Value>) -> (ServiceContext, Arc<ReplayingShellExecutor>) {
    let interactions = outputs
        .into_iter()
        .enumerate()
        .map(|(seq, output)| Interaction {
            seq: seq as u64,
            port: "shell".into(),
            method: "run".into(),
            input: json!({}),
            output,
        })
        .collect();
    let cassette =
        Cassette { name: "unit".into(), recorded_at: Utc::now(), host: "test".into(), interactions };
    let shell = Arc::new(ReplayingShellExecutor::new(CassetteReplayer::new(&cassette)));
    (ServiceContext::with_shell(shell.clone()), shell)
}

/// Same as [`replay`] with an escalation secret configured.
pub(crate) fn replay_privileged(
    outputs: Vec<Value>,
) -> (ServiceContext, Arc<ReplayingShellExecutor>) {
    let (ctx, shell) = replay(outputs);
    (ctx.with_escalation(Some(EscalationSecret::new("secret"))), shell)
}
