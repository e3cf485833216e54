//! `dpkg` package files and the installed-package database.

use crate::context::ServiceContext;
use crate::exec::Invocation;

use super::PackageManager;

/// Name of the package that ships the executable `command`.
#[must_use]
pub fn owning_package(ctx: &ServiceContext, command: &str) -> Option<String> {
    let output =
        ctx.execute_privileged(Invocation::shell(format!("dpkg --search `which {command}`")))?;
    if !output.success() {
        return None;
    }
    parse_owning_package(&output.stdout)
}

/// Installs the package file at `path`.
#[must_use]
pub fn install(ctx: &ServiceContext, path: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("dpkg --install {path}")))
        .is_some_and(|output| output.success())
}

/// Whether any line of `dpkg --list` mentions `name`.
#[must_use]
pub fn is_installed(ctx: &ServiceContext, name: &str) -> bool {
    ctx.execute_privileged(Invocation::shell(format!("dpkg --list | grep {name}")))
        .is_some_and(|output| output.success() && !output.stdout.is_empty())
}

/// Purges `name` along with its configuration files.
///
/// `dpkg` exits 0 with a warning when the package is not installed; that
/// counts as failure.
#[must_use]
pub fn uninstall(ctx: &ServiceContext, name: &str) -> bool {
    ctx.execute_privileged(Invocation::new(format!("dpkg --purge {name}")))
        .is_some_and(|output| output.success() && !output.stderr.starts_with("dpkg: warning:"))
}

/// Package name from `dpkg --search` output (`coreutils: /usr/bin/ls`).
#[must_use]
pub fn parse_owning_package(stdout: &str) -> Option<String> {
    stdout
        .trim_end_matches('\n')
        .split(':')
        .next()
        .filter(|name| !name.is_empty())
        .map(String::from)
}

/// [`PackageManager`] for `dpkg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dpkg;

impl PackageManager for Dpkg {
    fn name(&self) -> &'static str {
        "dpkg"
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
    use crate::testing::{out, replay};

    #[test]
    fn owner_is_first_colon_field() {
        assert_eq!(parse_owning_package("coreutils: /usr/bin/ls\n"), Some("coreutils".into()));
        assert_eq!(parse_owning_package(""), None);
    }

    #[test]
    fn owning_package_runs_search() {
        let (ctx, shell) = replay(vec![out(0, "openssh-client: /usr/bin/ssh\n", "")]);
        assert_eq!(owning_package(&ctx, "ssh"), Some("openssh-client".into()));
        assert_eq!(shell.issued(), vec!["dpkg --search `which ssh`"]);
    }

    #[test]
    fn purge_warning_is_failure() {
        let (ctx, shell) = replay(vec![
            out(0, "", "dpkg: warning: ignoring request to remove nginx which isn't installed\n"),
            out(0, "Purging configuration files for nginx ...\n", ""),
        ]);
        assert!(!uninstall(&ctx, "nginx"));
        assert!(uninstall(&ctx, "nginx"));
        assert_eq!(shell.issued()[0], "dpkg --purge nginx");
    }

    #[test]
    fn empty_listing_is_not_installed() {
        let (ctx, shell) = replay(vec![out(0, "", ""), out(1, "", "")]);
        assert!(!is_installed(&ctx, "curl"));
        assert!(!is_installed(&ctx, "curl"));
        assert_eq!(shell.issued()[0], "dpkg --list | grep curl");
    }
}
