//! `dnf` repository packages.

use crate::context::ServiceContext;
use crate::exec::Invocation;

use super::PackageManager;

/// Installs `package` from the configured repositories.
#[must_use]
pub fn install(ctx: &ServiceContext, package: &str) -> bool {
    succeeded(ctx, Invocation::new(format!("dnf install -y {package}")))
}

/// Whether any installed package name contains `package`.
#[must_use]
pub fn is_installed(ctx: &ServiceContext, package: &str) -> bool {
    ctx.execute_privileged(Invocation::shell(format!("dnf list --installed | grep {package}")))
        .is_some_and(|output| output.success() && !output.stdout.is_empty())
}

/// Removes `package`.
#[must_use]
pub fn uninstall(ctx: &ServiceContext, package: &str) -> bool {
    succeeded(ctx, Invocation::new(format!("dnf remove -y {package}")))
}

/// Upgrades every installed package.
#[must_use]
pub fn update(ctx: &ServiceContext) -> bool {
    succeeded(ctx, Invocation::new("dnf update -y"))
}

fn succeeded(ctx: &ServiceContext, invocation: Invocation) -> bool {
    ctx.execute_privileged(invocation).is_some_and(|output| output.success())
}

/// [`PackageManager`] for `dnf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dnf;

impl PackageManager for Dnf {
    fn name(&self) -> &'static str {
        "dnf"
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

    fn update(&self, ctx: &ServiceContext) -> Option<bool> {
        Some(update(ctx))
    }
}
