//! `rpm` package files and the installed-package database.

use crate::context::ServiceContext;
use crate::exec::Invocation;

use super::PackageManager;

/// Full name of the package that ships the executable `command`.
#[must_use]
pub fn owning_package(ctx: &ServiceContext, command: &str) -> Option<String> {
    let output = ctx.execute_privileged(Invocation::shell(format!("rpm -qf `which {command}`")))?;
    output.success().then(|| output.stdout.trim_end_matches('\n').to_string())
}

/// Installs the package file at `path`.
#[must_use]
pub fn install(ctx: &ServiceContext, path: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("rpm -i {path}")))
        .is_some_and(|output| output.success())
}

/// Whether any installed package name contains `name`.
#[must_use]
pub fn is_installed(ctx: &ServiceContext, name: &str) -> bool {
    ctx.execute_privileged(Invocation::shell(format!("rpm -qa | grep {name}")))
        .is_some_and(|output| output.success() && !output.stdout.is_empty())
}

/// Erases the installed package `name`.
#[must_use]
pub fn uninstall(ctx: &ServiceContext, name: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("rpm -e {name}")))
        .is_some_and(|output| output.success())
}

/// [`PackageManager`] for `rpm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rpm;

impl PackageManager for Rpm {
    fn name(&self) -> &'static str {
        "rpm"
    }

    fn install(&self, ctx: &ServiceContext, target: &str) -> bool {
        install(ctx, target)
    }

    fn is_installed(&self, ctx: &ServiceContext, name: &str) -> bool {
        is_installed(ctx, name)
    }

    fn uninstall(&self, ctx: &ServiceContext, name: &str) -> bool {
        uninstall(ctx, name)
    }

    fn tracks_files(&self) -> bool {
        true
    }

    fn owning_package(&self, ctx: &ServiceContext, command: &str) -> Option<String> {
        owning_package(ctx, command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{out, replay, replay_privileged};

    #[test]
    fn owning_package_strips_newline() {
        let (ctx, shell) = replay(vec![out(0, "firewalld-1.2.5-1.el9.noarch\n", "")]);
        assert_eq!(
            owning_package(&ctx, "firewall-cmd"),
            Some("firewalld-1.2.5-1.el9.noarch".into())
        );
        assert_eq!(shell.issued(), vec!["rpm -qf `which firewall-cmd`"]);
    }

    #[test]
    fn owning_package_absent_for_unknown_command() {
        let (ctx, _) = replay(vec![out(1, "", "rpm: no arguments given for query\n")]);
        assert_eq!(owning_package(&ctx, "not-a-command"), None);
    }

    #[test]
    fn installed_needs_output() {
        let (ctx, _) = replay(vec![out(0, "", ""), out(0, "openssl-3.0.7-24.el9.x86_64\n", "")]);
        assert!(!is_installed(&ctx, "openssl"));
        assert!(is_installed(&ctx, "openssl"));
    }

    #[test]
    fn file_install_and_erase() {
        let (ctx, shell) = replay_privileged(vec![out(0, "", ""), out(1, "", "error: package x is not installed\n")]);
        assert!(install(&ctx, "/tmp/agent.rpm"));
        assert!(!uninstall(&ctx, "x"));
        assert_eq!(
            shell.issued(),
            vec!["echo *** | sudo -S rpm -i /tmp/agent.rpm", "echo *** | sudo -S rpm -e x"]
        );
    }
}
