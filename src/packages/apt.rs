//! `apt-get` repository packages. Install state comes from `dpkg`.

use crate::context::ServiceContext;
use crate::exec::Invocation;

use super::{dpkg, PackageManager};

/// Installs `package` from the configured repositories.
#[must_use]
pub fn install(ctx: &ServiceContext, package: &str) -> bool {
    succeeded(ctx, format!("apt-get install -y {package}"))
}

/// Whether `package` is installed, according to `dpkg`.
#[must_use]
pub fn is_installed(ctx: &ServiceContext, package: &str) -> bool {
    dpkg::is_installed(ctx, package)
}

/// Purges `package` along with its configuration files.
#[must_use]
pub fn uninstall(ctx: &ServiceContext, package: &str) -> bool {
    succeeded(ctx, format!("apt-get purge -y {package}"))
}

/// Refreshes the package index.
#[must_use]
pub fn update(ctx: &ServiceContext) -> bool {
    succeeded(ctx, "apt-get update -y".to_string())
}

fn succeeded(ctx: &ServiceContext, command: String) -> bool {
    ctx.execute_privileged(Invocation::new(command)).is_some_and(|output| output.success())
}

/// [`PackageManager`] for `apt-get`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Apt;

impl PackageManager for Apt {
    fn name(&self) -> &'static str {
        "apt-get"
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
