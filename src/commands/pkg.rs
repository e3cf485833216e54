//! `linux-cmd pkg` handlers.

use crate::cli::PkgCommand;
use crate::context::ServiceContext;
use crate::packages::PackageManager;

use super::{print_flag, print_value};

/// Execute a `pkg` subcommand against `manager`.
///
/// # Errors
///
/// Returns an error string when the manager does not support the operation.
pub fn run(
    ctx: &ServiceContext,
    manager: &dyn PackageManager,
    command: &PkgCommand,
) -> Result<bool, String> {
    match command {
        PkgCommand::Install { target } => Ok(print_flag(manager.install(ctx, target))),
        PkgCommand::IsInstalled { name } => Ok(print_flag(manager.is_installed(ctx, name))),
        PkgCommand::Uninstall { name } => Ok(print_flag(manager.uninstall(ctx, name))),
        PkgCommand::Update => manager
            .update(ctx)
            .map(print_flag)
            .ok_or_else(|| format!("{} has no package index to update", manager.name())),
        PkgCommand::Owner { command } => {
            if !manager.tracks_files() {
                return Err(format!("{} cannot look up package owners", manager.name()));
            }
            Ok(print_value(manager.owning_package(ctx, command)))
        }
    }
}
