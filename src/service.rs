//! systemd unit control through `systemctl`.

use crate::colorlog::{eprint_colorlog, Color};
use crate::context::ServiceContext;
use crate::exec::Invocation;
use crate::ports::shell::ShellOutput;

/// Whether `service` is enabled to start at boot.
#[must_use]
pub fn is_enabled(ctx: &ServiceContext, service: &str) -> bool {
    query_equals(ctx, &format!("systemctl is-enabled {service}"), "enabled\n")
}

/// Whether `service` is currently active.
#[must_use]
pub fn is_running(ctx: &ServiceContext, service: &str) -> bool {
    query_equals(ctx, &format!("systemctl is-active {service}"), "active\n")
}

/// Enables `service` at boot.
#[must_use]
pub fn enable(ctx: &ServiceContext, service: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("systemctl enable {service}")))
        .is_some_and(|output| output.success())
}

/// Disables `service` at boot.
#[must_use]
pub fn disable(ctx: &ServiceContext, service: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("systemctl disable {service}")))
        .is_some_and(|output| output.success())
}

/// Starts `service`, printing the reason to stderr on failure.
#[must_use]
pub fn start(ctx: &ServiceContext, service: &str) -> bool {
    transition(ctx, "start", service)
}

/// Stops `service`, printing the reason to stderr on failure.
#[must_use]
pub fn stop(ctx: &ServiceContext, service: &str) -> bool {
    transition(ctx, "stop", service)
}

/// Restarts `service`, printing the reason to stderr on failure.
#[must_use]
pub fn restart(ctx: &ServiceContext, service: &str) -> bool {
    transition(ctx, "restart", service)
}

fn query_equals(ctx: &ServiceContext, command: &str, expected: &str) -> bool {
    ctx.execute_privileged(Invocation::new(command))
        .is_some_and(|output| output.success() && output.stdout == expected)
}

fn transition(ctx: &ServiceContext, verb: &str, service: &str) -> bool {
    let Some(output) = ctx.execute_privileged(Invocation::new(format!("systemctl {verb} {service}")))
    else {
        return false;
    };
    if output.success() {
        return true;
    }
    for (line, color) in failure_report(verb, service, &output) {
        eprint_colorlog(&line, color);
    }
    false
}

/// Header and reason lines printed when a `systemctl` transition fails.
/// Stop and restart failures carry a bold reason.
fn failure_report(verb: &str, service: &str, output: &ShellOutput) -> [(String, Color); 2] {
    let (outcome, reason_color) = match verb {
        "start" => ("was not started", Color::Yellow),
        "stop" => ("was not stopped", Color::BYellow),
        _ => ("was not restarted", Color::BYellow),
    };
    [
        (format!("<[ERROR] Service '{service}' {outcome}.>"), Color::BRed),
        (format!("<* reason: {}>", output.stderr.trim_end()), reason_color),
    ]
}
