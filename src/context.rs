//! Service context bundling the shell port and the escalation secret.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::adapters::live::LiveShellExecutor;
use crate::adapters::recording::RecordingShellExecutor;
use crate::adapters::replaying::ReplayingShellExecutor;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::error::CassetteError;
use crate::exec::{EscalationSecret, Invocation};
use crate::ports::shell::{ShellExecutor, ShellOutput};

/// Everything a wrapper needs to run one tool invocation.
///
/// Constructors wire up different shell adapters (live, recording,
/// replaying); wrappers never know which one they are talking to.
pub struct ServiceContext {
    /// Shell executor for running commands.
    pub shell: Arc<dyn ShellExecutor>,
    /// Secret for operations that run under `sudo`.
    escalation: Option<EscalationSecret>,
}

impl ServiceContext {
    /// Creates a context that runs commands on this host.
    #[must_use]
    pub fn live() -> Self {
        Self::with_shell(Arc::new(LiveShellExecutor))
    }

    /// Creates a context around any shell executor.
    #[must_use]
    pub fn with_shell(shell: Arc<dyn ShellExecutor>) -> Self {
        Self { shell, escalation: None }
    }

    /// Creates a live context that records every invocation into `session`.
    ///
    /// The context must be dropped before the session is finished.
    #[must_use]
    pub fn recording(session: &RecordingSession) -> Self {
        Self::with_shell(Arc::new(RecordingShellExecutor::new(
            Box::new(LiveShellExecutor),
            Arc::clone(&session.shell),
        )))
    }

    /// Creates a context that replays a cassette file instead of running
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, CassetteError> {
        Ok(Self::replaying_from(&Cassette::load(path)?))
    }

    /// Creates a replaying context from an in-memory cassette.
    #[must_use]
    pub fn replaying_from(cassette: &Cassette) -> Self {
        Self::with_shell(Arc::new(ReplayingShellExecutor::new(CassetteReplayer::new(cassette))))
    }

    /// Sets the secret used by privileged operations.
    #[must_use]
    pub fn with_escalation(mut self, secret: Option<EscalationSecret>) -> Self {
        self.escalation = secret;
        self
    }

    /// The configured escalation secret, if any.
    #[must_use]
    pub fn secret(&self) -> Option<&EscalationSecret> {
        self.escalation.as_ref()
    }

    /// Runs an invocation as given.
    ///
    /// A launch failure is logged and reported as `None`; a nonzero exit
    /// status is returned like any other result.
    #[must_use]
    pub fn execute(&self, invocation: &Invocation) -> Option<ShellOutput> {
        match self.shell.run(invocation) {
            Ok(output) => Some(output),
            Err(err) => {
                warn!(command = %invocation.redacted(), error = %err, "command did not run");
                None
            }
        }
    }

    /// Runs an invocation under `sudo` when an escalation secret is configured.
    #[must_use]
    pub fn execute_privileged(&self, invocation: Invocation) -> Option<ShellOutput> {
        self.execute(&invocation.escalate(self.secret()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fail, out, replay};

    #[test]
    fn execute_passes_output_through() {
        let (ctx, shell) = replay(vec![out(3, "", "nope\n")]);
        let output = ctx.execute(&Invocation::new("false")).unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, "nope\n");
        assert_eq!(shell.issued(), vec!["false"]);
    }

    #[test]
    fn launch_failure_becomes_none() {
        let (ctx, _) = replay(vec![fail("failed to launch `nmcli`")]);
        assert!(ctx.execute(&Invocation::new("nmcli connection reload")).is_none());
    }

    #[test]
    fn privileged_execution_uses_secret_when_configured() {
        let (ctx, shell) = replay(vec![out(0, "", ""), out(0, "", "")]);
        let _ = ctx.execute_privileged(Invocation::new("dnf update -y"));
        let ctx = ctx.with_escalation(Some(EscalationSecret::new("pw")));
        let _ = ctx.execute_privileged(Invocation::new("dnf update -y"));
        assert_eq!(shell.issued(), vec!["dnf update -y", "echo *** | sudo -S dnf update -y"]);
    }

    #[test]
    fn replaying_context_from_cassette_file() {
        let dir = std::env::temp_dir().join("linux_cmd_ctx_test_file");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ctx.cassette.yaml");

        let mut recorder =
            crate::cassette::recorder::CassetteRecorder::new(&path, "ctx-test", "node1");
        recorder.record(
            "shell",
            "run",
            serde_json::json!({"command": "whoami", "shell": false}),
            out(0, "root\n", ""),
        );
        recorder.finish().unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();
        let output = ctx.execute(&Invocation::new("whoami")).unwrap();
        assert_eq!(output.stdout, "root\n");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_missing_file_is_an_error() {
        assert!(ServiceContext::replaying(Path::new("/nonexistent/ctx.cassette.yaml")).is_err());
    }
}
