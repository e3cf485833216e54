//! Command dispatch and handlers.
//!
//! Every handler runs one wrapper operation, prints its result on stdout and
//! reports whether the operation succeeded. Booleans print as `true` or
//! `false`; optional values print nothing when absent; lists print one item
//! per line.

pub mod account;
pub mod firewall;
pub mod fs;
pub mod net;
pub mod pkg;
pub mod service;
pub mod sys;

use std::fmt::Display;

use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::colorlog;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::process;

/// Dispatch a parsed command to its handler.
///
/// With a replay cassette configured nothing runs on the host. With a record
/// directory configured every invocation is saved to a cassette in a
/// timestamped directory below it.
///
/// # Errors
///
/// Returns an error string if the cassette cannot be loaded or written, or
/// the selected handler fails.
pub fn dispatch(command: &Command, config: &Config) -> Result<bool, String> {
    if let Some(path) = &config.replay_cassette {
        info!(cassette = %path.display(), "replaying");
        let ctx = ServiceContext::replaying(path)
            .map_err(|e| e.to_string())?
            .with_escalation(config.escalation.clone());
        return dispatch_with_context(command, &ctx);
    }

    let session = config.record_dir.as_deref().map(RecordingSession::new).transpose()?;
    let ctx = match &session {
        Some(session) => {
            info!(dir = %session.output_dir().display(), "recording");
            ServiceContext::recording(session)
        }
        None => ServiceContext::live(),
    }
    .with_escalation(config.escalation.clone());

    let result = dispatch_with_context(command, &ctx);

    // Finish recording after command completes (even on error)
    if let Some(session) = session {
        // Drop context first to release Arc references
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected handler fails.
pub fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<bool, String> {
    match command {
        Command::Firewall(command) => Ok(firewall::run(ctx, command)),
        Command::Service(command) => Ok(service::run(ctx, command)),
        Command::Pkg { manager, command } => pkg::run(ctx, manager.manager(), command),
        Command::Net(command) => Ok(net::run(ctx, command)),
        Command::Fs(command) => Ok(fs::run(ctx, command)),
        Command::Account(command) => Ok(account::run(ctx, command)),
        Command::Ps { pid } => Ok(print_list(process::process_by_id(ctx, *pid))),
        Command::Sys(command) => Ok(sys::run(ctx, command)),
        Command::Print { text, color, no_newline } => {
            if *no_newline {
                colorlog::print_inline(&colorlog::colorize(text, *color));
            } else {
                colorlog::print_colorlog(text, *color);
            }
            Ok(true)
        }
    }
}

/// Finish a recording session and print the cassette location.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

/// Prints a boolean result.
pub(crate) fn print_flag(value: bool) -> bool {
    println!("{value}");
    value
}

/// Prints an optional value; absent prints nothing.
pub(crate) fn print_value(value: Option<impl Display>) -> bool {
    match value {
        Some(value) => {
            println!("{value}");
            true
        }
        None => false,
    }
}

/// Prints a list one item per line; absent prints nothing.
pub(crate) fn print_list(items: Option<Vec<impl Display>>) -> bool {
    match items {
        Some(items) => {
            for item in items {
                println!("{item}");
            }
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AccountCommand, SysCommand};
    use crate::testing::{out, replay};

    #[test]
    fn flag_result_is_exit_status() {
        let (ctx, _) = replay(vec![out(1, "", "")]);
        let command = Command::Account(AccountCommand::Exists { username: "ghost".into() });
        assert_eq!(dispatch_with_context(&command, &ctx), Ok(false));
    }

    #[test]
    fn present_value_is_success() {
        let (ctx, shell) = replay(vec![out(0, "PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n", "")]);
        assert_eq!(dispatch_with_context(&Command::Sys(SysCommand::Distro), &ctx), Ok(true));
        assert_eq!(shell.remaining(), 0);
    }

    #[test]
    fn ps_absent_is_failure() {
        let (ctx, _) = replay(vec![out(1, "", "")]);
        assert_eq!(dispatch_with_context(&Command::Ps { pid: 4242 }, &ctx), Ok(false));
    }

    #[test]
    fn replay_mode_loads_cassette_file() {
        let config = Config {
            escalation: None,
            record_dir: None,
            replay_cassette: Some("/nonexistent/linux-cmd.cassette.yaml".into()),
            log_filter: "warn".into(),
        };
        let err = dispatch(&Command::Sys(SysCommand::Distro), &config).unwrap_err();
        assert!(err.contains("linux-cmd.cassette.yaml"), "{err}");
    }

    #[test]
    fn list_printer_reports_presence() {
        assert!(print_list(Some(vec!["a", "b"])));
        assert!(print_list(Some(Vec::<String>::new())));
        assert!(!print_list(None::<Vec<String>>));
        assert!(!print_value(None::<String>));
    }
}
