//! Account queries for the invoking user.

use crate::context::ServiceContext;
use crate::exec::Invocation;

/// Name of the user running this process (`whoami`).
#[must_use]
pub fn current_username(ctx: &ServiceContext) -> Option<String> {
    let output = ctx.execute(&Invocation::new("whoami"))?;
    output.success().then(|| output.stdout.trim_end_matches('\n').to_string())
}

/// Home directory of the invoking user (`$HOME` as a child shell sees it).
#[must_use]
pub fn home_dir(ctx: &ServiceContext) -> Option<String> {
    let output = ctx.execute(&Invocation::shell("echo $HOME"))?;
    output.success().then(|| output.stdout.trim_end_matches('\n').to_string())
}

/// Whether the user is root, or holds sudo rights the configured secret
/// unlocks.
///
/// Probes by reading the first line of `/etc/sudo.conf` with escalation.
#[must_use]
pub fn is_root_or_sudoer(ctx: &ServiceContext) -> bool {
    ctx.execute_privileged(Invocation::shell("head -n 1 /etc/sudo.conf"))
        .is_some_and(|output| output.success())
}

/// Whether a local account named `username` exists in `/etc/passwd`.
#[must_use]
pub fn user_exists(ctx: &ServiceContext, username: &str) -> bool {
    ctx.execute_privileged(Invocation::shell(format!("cat /etc/passwd | grep {username}")))
        .is_some_and(|output| passwd_has_user(&output.stdout, username))
}

/// Whether any `/etc/passwd` line names exactly `username`.
#[must_use]
pub fn passwd_has_user(passwd: &str, username: &str) -> bool {
    passwd.lines().any(|line| line.split(':').next() == Some(username))
}
