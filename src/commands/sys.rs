//! `linux-cmd sys` handlers.

use crate::cli::SysCommand;
use crate::context::ServiceContext;
use crate::system;

use super::{print_list, print_value};

/// Execute a `sys` subcommand.
pub fn run(ctx: &ServiceContext, command: &SysCommand) -> bool {
    match command {
        SysCommand::Env { name: Some(name) } => print_value(system::env_value(ctx, name)),
        SysCommand::Env { name: None } => print_list(
            system::environment(ctx)
                .map(|vars| {
                    vars.into_iter()
                        .map(|(name, value)| format!("{name}={value}"))
                        .collect::<Vec<String>>()
                }),
        ),
        SysCommand::Distro => print_value(system::linux_distribution(ctx)),
        SysCommand::Ipv4 { ifc } => print_value(system::interface_ipv4(ctx, ifc)),
    }
}
